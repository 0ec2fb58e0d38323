use url::form_urlencoded;

/// Pagination query accepted by the list endpoints. Fields left as `None`
/// are dropped from the query string entirely.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub include_deleted: Option<bool>,
}

/// Offset pagination used by the role endpoints.
#[derive(Debug, Clone, Default)]
pub struct RoleQuery {
    pub skip: Option<u64>,
    pub take: Option<u64>,
}

impl ListQuery {
    pub fn to_query_string(&self) -> String {
        serialize_query(&[
            ("page", self.page.map(|v| v.to_string())),
            ("limit", self.limit.map(|v| v.to_string())),
            ("search", self.search.clone()),
            ("includeDeleted", self.include_deleted.map(|v| v.to_string())),
        ])
    }
}

impl RoleQuery {
    pub fn to_query_string(&self) -> String {
        serialize_query(&[
            ("skip", self.skip.map(|v| v.to_string())),
            ("take", self.take.map(|v| v.to_string())),
        ])
    }
}

/// Builds `?k=v&...` from the present pairs, percent-encoded. Returns an
/// empty string when nothing is present.
pub fn serialize_query(pairs: &[(&str, Option<String>)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}
