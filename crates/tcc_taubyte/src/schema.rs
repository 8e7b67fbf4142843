//! Project source-tree schema.
//!
//! ```text
//! config.yaml
//! <category>/<name>.yaml
//! applications/<app>/config.yaml
//! applications/<app>/<category>/<name>.yaml
//! ```

use crate::kinds;
use once_cell::sync::Lazy;
use regex::Regex;
use tcc_object::Value;
use tcc_schema::{Attribute, Engine, Node, StringMatch, either};

static FQDN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^(?i)([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z][a-z0-9-]{0,61}[a-z0-9]\.?$").ok()
});

/// Accepts fully qualified domain names
///
/// # Errors
///
/// Returns `invalid fqdn`
pub fn validate_fqdn(value: &Value) -> Result<(), String> {
    match value.as_str() {
        Some(fqdn) if fqdn.len() <= 253 && FQDN.as_ref().is_some_and(|re| re.is_match(fqdn)) => {
            Ok(())
        }
        _ => Err("invalid fqdn".to_string()),
    }
}

fn one_of(options: &'static [&'static str]) -> impl Fn(&Value) -> Result<(), String> + Send + Sync {
    move |value| match value.as_str() {
        Some(s) if options.contains(&s) => Ok(()),
        _ => Err(format!("`{}` is not one of {}", value, options.join(", "))),
    }
}

fn at(path: &[&str]) -> Vec<StringMatch> {
    path.iter().copied().map(StringMatch::from).collect()
}

fn common() -> Vec<Attribute> {
    vec![
        Attribute::string("id").required(),
        Attribute::string("description"),
        Attribute::list("tags"),
    ]
}

fn execution() -> Vec<Attribute> {
    vec![
        Attribute::string("source"),
        Attribute::string("timeout").with_path(at(&["execution", "timeout"])),
        Attribute::string("memory")
            .with_path(at(&["execution", "memory"]))
            .with_compat(at(&["execution", "mem"])),
        Attribute::string("call").with_path(at(&["execution", "call"])),
    ]
}

fn functions() -> Vec<Attribute> {
    let trigger = |name: &str| at(&["trigger", name]);
    let mut attributes = vec![
        Attribute::string("type")
            .with_path(trigger("type"))
            .with_validator(one_of(&["http", "https", "pubsub", "p2p"])),
        Attribute::string("http-method").with_path(trigger("method")),
        Attribute::list("http-methods").with_path(trigger("methods")),
        Attribute::list("http-domains").with_path(trigger("domains")),
        Attribute::list("http-paths").with_path(trigger("paths")),
        Attribute::string("pubsub-channel").with_path(trigger("channel")),
        Attribute::string("p2p-protocol").with_path(trigger("protocol")),
        Attribute::string("p2p-command").with_path(trigger("command")),
        Attribute::bool("local")
            .with_path(trigger("local"))
            .with_compat(at(&["local"])),
    ];
    attributes.extend(execution());
    attributes
}

fn repository() -> Vec<Attribute> {
    let provider = || [StringMatch::from("source"), either(&["github"])];
    let under = |name: &str| {
        let mut path = provider().to_vec();
        path.push(StringMatch::from(name));
        path
    };
    vec![
        Attribute::string("git-provider").key().with_path(provider()),
        Attribute::string("github-id").with_path(under("id")),
        Attribute::string("github-fullname").with_path(under("fullname")),
        Attribute::string("branch").with_path(at(&["source", "branch"])),
        Attribute::list("paths").with_path(at(&["source", "paths"])),
    ]
}

fn websites() -> Vec<Attribute> {
    let mut attributes = repository();
    attributes.push(Attribute::list("http-domains").with_path(at(&["domains"])));
    attributes
}

fn domains() -> Vec<Attribute> {
    vec![
        Attribute::string("fqdn").required().with_validator(validate_fqdn),
        Attribute::string("cert-type")
            .with_path(at(&["certificate", "type"]))
            .with_validator(one_of(&["inline", "auto"])),
        Attribute::string("cert-file").with_path(at(&["certificate", "cert"])),
        Attribute::string("key-file").with_path(at(&["certificate", "key"])),
    ]
}

fn databases() -> Vec<Attribute> {
    vec![
        Attribute::string("match"),
        Attribute::bool("regex"),
        Attribute::string("network-access")
            .with_path(at(&["access", "network"]))
            .with_validator(one_of(&["all", "subnet", "host"])),
        Attribute::int("min").with_path(at(&["replicas", "min"])).with_default(1i64),
        Attribute::int("max").with_path(at(&["replicas", "max"])).with_default(1i64),
        Attribute::string("size").with_path(at(&["storage", "size"])),
        Attribute::string("encryption-type").with_path(at(&["encryption", "type"])),
        Attribute::string("encryption-key").with_path(at(&["encryption", "key"])),
    ]
}

fn storages() -> Vec<Attribute> {
    let kind = || either(&["object", "streaming"]);
    let under = |name: &str| [kind(), StringMatch::from(name)];
    vec![
        Attribute::string("match"),
        Attribute::bool("regex"),
        Attribute::string("network-access")
            .with_path(at(&["access", "network"]))
            .with_validator(one_of(&["all", "subnet", "host"])),
        Attribute::string("type").key().with_path([kind()]),
        Attribute::bool("versioning")
            .with_path(under("versioning"))
            .with_default(false),
        Attribute::string("size").with_path(under("size")),
        Attribute::string("ttl").with_path(under("ttl")),
    ]
}

fn messaging() -> Vec<Attribute> {
    vec![
        Attribute::bool("local").with_default(false),
        Attribute::string("match").with_path(at(&["channel", "match"])),
        Attribute::bool("regex").with_path(at(&["channel", "regex"])),
        Attribute::bool("mqtt")
            .with_path(at(&["bridges", "mqtt", "enable"]))
            .with_default(false),
        Attribute::bool("websocket")
            .with_path(at(&["bridges", "websocket", "enable"]))
            .with_default(false),
    ]
}

fn services() -> Vec<Attribute> {
    vec![Attribute::string("protocol")]
}

/// Attributes of one resource of `category`, before normalization
#[must_use]
pub fn resource_attributes(category: &str) -> Vec<Attribute> {
    let specific = match category {
        "functions" => functions(),
        "smartops" => execution(),
        "libraries" => repository(),
        "websites" => websites(),
        "domains" => domains(),
        "databases" => databases(),
        "storages" => storages(),
        "messaging" => messaging(),
        "services" => services(),
        _ => Vec::new(),
    };
    let mut attributes = common();
    attributes.extend(specific);
    attributes
}

fn categories() -> Vec<Node> {
    kinds::ALL
        .iter()
        .map(|kind| {
            Node::group(kind.category)
                .with_child(Node::leaf(StringMatch::Any).with_attributes(resource_attributes(kind.category)))
        })
        .collect()
}

/// Root node of a project tree
#[must_use]
pub fn project() -> Node {
    let application = Node::group(StringMatch::Any)
        .with_attributes(common())
        .with_children(categories());

    Node::group(StringMatch::Any)
        .with_attributes([
            Attribute::string("id").required(),
            Attribute::string("name"),
            Attribute::string("description"),
            Attribute::string("email").with_path(at(&["notification", "email"])),
            Attribute::list("tags"),
        ])
        .with_child(Node::group(tcc_transform::transformer::APPLICATIONS).with_child(application))
        .with_children(categories())
}

/// Engine over [`project`]
#[must_use]
pub fn engine() -> Engine {
    Engine::new(project())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqdn() {
        assert!(validate_fqdn(&Value::from("example.com")).is_ok());
        assert!(validate_fqdn(&Value::from("www.hal.computers.com.")).is_ok());
        assert!(validate_fqdn(&Value::from("a-b.example.io")).is_ok());

        for bad in ["not a domain!", "localhost", "-a.com", "a..com", ""] {
            assert_eq!(validate_fqdn(&Value::from(bad)).unwrap_err(), "invalid fqdn", "{}", bad);
        }
        assert!(validate_fqdn(&Value::Int(3)).is_err());
    }

    #[test]
    fn test_one_of() {
        let check = one_of(&["inline", "auto"]);
        assert!(check(&Value::from("auto")).is_ok());
        assert!(check(&Value::from("manual")).unwrap_err().contains("inline, auto"));
    }

    #[test]
    fn test_every_category_has_common_attributes() {
        for kind in kinds::ALL {
            let attributes = resource_attributes(kind.category);
            let id = attributes.iter().find(|a| a.name == "id").unwrap();
            assert!(id.required, "{}", kind.category);
            assert!(attributes.iter().any(|a| a.name == "tags"));
        }
    }

    #[test]
    fn test_functions_and_smartops_differ() {
        let names = |c: &str| -> Vec<String> {
            resource_attributes(c).into_iter().map(|a| a.name).collect()
        };
        assert!(names("functions").contains(&"type".to_string()));
        assert!(!names("smartops").contains(&"type".to_string()));
        assert!(names("smartops").contains(&"memory".to_string()));
    }

    #[test]
    fn test_project_layout() {
        let root = project();
        assert!(root.is_group());
        assert!(root.find_child("applications").unwrap().is_group());
        let functions = root.find_child("functions").unwrap();
        assert!(!functions.find_child("hello").unwrap().is_group());
        assert!(root.find_child("nope").is_none());

        let app = root.find_child("applications").unwrap().find_child("my-app").unwrap();
        assert!(app.has_required());
        assert!(app.find_child("domains").is_some());
    }
}
