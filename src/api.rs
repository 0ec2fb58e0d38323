/// Catalog of backend endpoints, rooted at the configured base URL
/// (typically `http://host:port/api/v1`). Every URL the client touches is
/// built here so path conventions live in one place.
#[derive(Debug, Clone)]
pub struct Api {
    base: String,
}

impl Api {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    // Auth

    pub fn auth_register(&self) -> String {
        format!("{}/auth/register", self.base)
    }

    pub fn auth_send_otp(&self) -> String {
        format!("{}/auth/otp", self.base)
    }

    pub fn auth_login(&self) -> String {
        format!("{}/auth/login", self.base)
    }

    pub fn auth_refresh_token(&self) -> String {
        format!("{}/auth/refresh-token", self.base)
    }

    pub fn auth_logout(&self) -> String {
        format!("{}/auth/logout", self.base)
    }

    pub fn auth_forgot_password(&self) -> String {
        format!("{}/auth/forgot-password", self.base)
    }

    pub fn auth_reset_password(&self) -> String {
        format!("{}/auth/reset-password", self.base)
    }

    pub fn auth_profile(&self) -> String {
        format!("{}/auth/profile", self.base)
    }

    pub fn auth_users(&self) -> String {
        format!("{}/auth", self.base)
    }

    pub fn auth_lock_user(&self, user_id: &str) -> String {
        format!("{}/auth/{user_id}/lock", self.base)
    }

    pub fn auth_unlock_user(&self, user_id: &str) -> String {
        format!("{}/auth/{user_id}/unlock", self.base)
    }

    pub fn auth_violations(&self, user_id: &str) -> String {
        format!("{}/auth/{user_id}/violations", self.base)
    }

    pub fn auth_avatar(&self) -> String {
        format!("{}/auth/avatar", self.base)
    }

    // Product

    pub fn product_create(&self) -> String {
        format!("{}/product/create", self.base)
    }

    pub fn product(&self, id: &str) -> String {
        format!("{}/product/{id}", self.base)
    }

    pub fn product_list(&self) -> String {
        format!("{}/product/pagination", self.base)
    }

    pub fn product_all(&self) -> String {
        format!("{}/product", self.base)
    }

    pub fn product_images(&self, id: &str) -> String {
        format!("{}/product/{id}/images", self.base)
    }

    pub fn product_image(&self, product_id: &str, image_id: &str) -> String {
        format!("{}/product/{product_id}/images/{image_id}", self.base)
    }

    pub fn product_primary_image(&self, product_id: &str, image_id: &str) -> String {
        format!("{}/product/{product_id}/images/{image_id}/primary", self.base)
    }

    // Cart

    pub fn cart(&self) -> String {
        format!("{}/cart", self.base)
    }

    pub fn cart_item(&self, id: &str) -> String {
        format!("{}/cart/{id}", self.base)
    }

    pub fn cart_list(&self) -> String {
        format!("{}/cart/pagination", self.base)
    }

    // Category

    pub fn category_create(&self) -> String {
        format!("{}/category/create", self.base)
    }

    pub fn category(&self, id: &str) -> String {
        format!("{}/category/{id}", self.base)
    }

    pub fn category_list(&self) -> String {
        format!("{}/category/pagination", self.base)
    }

    pub fn category_all(&self) -> String {
        format!("{}/category", self.base)
    }

    // Role

    pub fn role_create(&self) -> String {
        format!("{}/role/create", self.base)
    }

    pub fn role(&self, id: &str) -> String {
        format!("{}/role/{id}", self.base)
    }

    pub fn role_restore(&self, id: &str) -> String {
        format!("{}/role/{id}/restore", self.base)
    }

    pub fn role_list(&self) -> String {
        format!("{}/role", self.base)
    }

    pub fn role_permissions(&self, role_id: &str) -> String {
        format!("{}/role/{role_id}/permissions", self.base)
    }

    pub fn role_user_roles(&self, user_id: &str) -> String {
        format!("{}/role/users/{user_id}/roles", self.base)
    }
}
