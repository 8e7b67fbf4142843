//! Resource kinds.
//!
//! Each kind is a category directory of one-document-per-resource. The
//! tables below drive the normalize pass and its inverse; the schema for
//! each kind lives in [`crate::schema`].

/// Access flag derived from `network-access`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// `local = (network-access == host)`; inverse writes `host` or `all`
    Local,
    /// `public = (network-access == all)`; inverse writes `all` or `host`
    Public,
}

/// How pass 4 indexes a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Links {
    /// By resource name under the project
    Name,
    /// By fqdn
    Domain,
    /// By hashed channel match
    Messaging,
}

/// Static description of one resource category
#[derive(Debug, Clone, Copy)]
pub struct Kind {
    /// Directory name and object-tree key
    pub category: &'static str,
    /// Source name to canonical name
    pub renames: &'static [(&'static str, &'static str)],
    /// Attributes holding byte sizes
    pub sizes: &'static [&'static str],
    /// Attributes holding durations
    pub durations: &'static [&'static str],
    /// Access flag handling
    pub access: Option<Access>,
    /// Has a trigger `type` that yields `secure`
    pub trigger: bool,
    /// Its `domains` are served over HTTP
    pub http: bool,
    /// Repository type written for git-backed kinds
    pub repository: Option<&'static str>,
    /// Index shape
    pub links: Links,
}

impl Kind {
    const fn named(category: &'static str) -> Self {
        Self {
            category,
            renames: &[],
            sizes: &[],
            durations: &[],
            access: None,
            trigger: false,
            http: false,
            repository: None,
            links: Links::Name,
        }
    }
}

/// Serverless functions
pub const FUNCTIONS: Kind = Kind {
    renames: &[
        ("http-method", "method"),
        ("http-methods", "methods"),
        ("http-domains", "domains"),
        ("http-paths", "paths"),
        ("pubsub-channel", "channel"),
        ("p2p-command", "command"),
    ],
    sizes: &["memory"],
    durations: &["timeout"],
    trigger: true,
    http: true,
    ..Kind::named("functions")
};

/// Smart operations
pub const SMARTOPS: Kind = Kind {
    sizes: &["memory"],
    durations: &["timeout"],
    trigger: true,
    ..Kind::named("smartops")
};

/// Code libraries
pub const LIBRARIES: Kind = Kind {
    renames: &[
        ("github-id", "repository-id"),
        ("github-fullname", "repository-name"),
    ],
    repository: Some("library"),
    ..Kind::named("libraries")
};

/// Static websites
pub const WEBSITES: Kind = Kind {
    renames: &[
        ("http-domains", "domains"),
        ("github-id", "repository-id"),
        ("github-fullname", "repository-name"),
    ],
    http: true,
    repository: Some("website"),
    ..Kind::named("websites")
};

/// Domains
pub const DOMAINS: Kind = Kind {
    renames: &[
        ("cert-type", "certificate-type"),
        ("cert-file", "certificate-data"),
        ("key-file", "certificate-key"),
    ],
    links: Links::Domain,
    ..Kind::named("domains")
};

/// Databases
pub const DATABASES: Kind = Kind {
    sizes: &["size"],
    access: Some(Access::Local),
    ..Kind::named("databases")
};

/// Object and streaming storages
pub const STORAGES: Kind = Kind {
    sizes: &["size"],
    durations: &["ttl"],
    access: Some(Access::Public),
    ..Kind::named("storages")
};

/// Messaging channels
pub const MESSAGING: Kind = Kind {
    renames: &[("websocket", "webSocket")],
    links: Links::Messaging,
    ..Kind::named("messaging")
};

/// P2P services
pub const SERVICES: Kind = Kind::named("services");

/// Every kind, in pass order
pub const ALL: [&Kind; 9] = [
    &DOMAINS,
    &LIBRARIES,
    &FUNCTIONS,
    &SMARTOPS,
    &WEBSITES,
    &DATABASES,
    &STORAGES,
    &MESSAGING,
    &SERVICES,
];

/// Kind by category name
#[must_use]
pub fn by_category(category: &str) -> Option<&'static Kind> {
    ALL.iter().copied().find(|k| k.category == category)
}
