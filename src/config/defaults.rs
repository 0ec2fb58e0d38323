pub fn server() -> String {
    String::from("http://localhost:8080/api/v1")
}

pub fn token_path() -> String {
    String::from("~/.local/share/shopkit/tokens.json")
}

pub fn redirect_delay_ms() -> u64 {
    1000
}

pub fn login_page() -> String {
    String::from("/pages/auth/login")
}

pub fn home_page() -> String {
    String::from("/")
}

pub fn admin_dashboard_page() -> String {
    String::from("/pages/admin/dashboard")
}

pub fn pages() -> super::PagesConfig {
    super::PagesConfig {
        login: login_page(),
        home: home_page(),
        admin_dashboard: admin_dashboard_page(),
    }
}
