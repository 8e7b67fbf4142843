//! Store keys and index paths.
//!
//! Every key is `/`-joined. `app` segments appear only for resources that
//! live inside an application.

/// Project-relative prefix for application resources
#[must_use]
pub fn app_prefix(app: Option<&str>) -> String {
    match app {
        Some(app) => format!("applications/{}/", app),
        None => String::new(),
    }
}

/// Store key mapping a resource name to its id
#[must_use]
pub fn name_key(app: Option<&str>, category: &str, name: &str) -> String {
    format!("{}{}/{}", app_prefix(app), category, name)
}

/// Canonical naming-service path of a resource on a branch
#[must_use]
pub fn tns_path(project: &str, branch: &str, app: Option<&str>, category: &str, id: &str) -> String {
    format!(
        "projects/{}/branches/{}/{}{}/{}",
        project,
        branch,
        app_prefix(app),
        category,
        id
    )
}

/// Links of a resource indexed by name
#[must_use]
pub fn name_links(project: &str, app: Option<&str>, category: &str, name: &str) -> String {
    format!(
        "projects/{}/{}{}/{}/versioning/links",
        project,
        app_prefix(app),
        category,
        name
    )
}

/// Labels of `fqdn` in reverse order, `/`-joined
#[must_use]
pub fn reverse_fqdn(fqdn: &str) -> String {
    fqdn.trim_end_matches('.')
        .split('.')
        .rev()
        .collect::<Vec<_>>()
        .join("/")
}

/// Links of a domain
#[must_use]
pub fn domain_links(fqdn: &str) -> String {
    format!("domains/{}/versioning/links", reverse_fqdn(fqdn))
}

/// Resources served over HTTP on `fqdn`
#[must_use]
pub fn http_links(fqdn: &str) -> String {
    format!("http/{}/links", reverse_fqdn(fqdn))
}

/// Links of a messaging channel, by channel hash
#[must_use]
pub fn messaging_links(hash: &str) -> String {
    format!("messaging/{}/versioning/links", hash)
}

/// Base of the repository entries for a project
#[must_use]
pub fn repository(provider: &str, repository_id: &str, project: &str) -> String {
    format!(
        "repositories/{}/{}/projects/{}",
        provider, repository_id, project
    )
}
