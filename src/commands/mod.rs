//! Command tree of the `cloud` CLI and its completion wiring
//!
//! [`command`] defines the commands with clap; [`register`] attaches the
//! catalog backed providers and the static flag tables to a
//! [`CompletionEngine`].

pub mod catalog;

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgAction, Command};

pub use catalog::{Catalog, InMemoryCatalog, Resource, ResourceKind};

use crate::error::Result;
use crate::repl::completion::{
    CommandProvider, Completable, CompletionEngine, FlagAwareProvider, FlagProvider, Suggestion,
};

/// List commands accepting `--output`
pub const LIST_COMMANDS: &[&str] = &[
    "environment list",
    "kafka cluster list",
    "kafka topic list",
    "api-key list",
    "service-account list",
];

/// Values of the global `--output` flag
pub const OUTPUT_FORMATS: &[(&str, &str)] = &[
    ("human", "Human readable table"),
    ("json", "JSON document"),
    ("yaml", "YAML document"),
];

fn output_formats() -> Vec<Suggestion> {
    OUTPUT_FORMATS
        .iter()
        .map(|(value, help)| Suggestion::new(*value, *help))
        .collect()
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).required(true).help(help)
}

fn resource_flag() -> Arg {
    Arg::new("resource")
        .long("resource")
        .help("Resource ID the API key is scoped to")
}

/// The `cloud` command tree
pub fn command() -> Command {
    Command::new("cloud")
        .about("Manage cloud resources")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .global(true)
                .value_parser(["human", "json", "yaml"])
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase verbosity"),
        )
        .subcommand(
            Command::new("login")
                .about("Log in to the cloud")
                .arg(Arg::new("user").help("Account email")),
        )
        .subcommand(Command::new("logout").about("Log out of the cloud"))
        .subcommand(environment())
        .subcommand(kafka())
        .subcommand(api_key())
        .subcommand(service_account())
        .subcommand(Command::new("help").about("Show available commands"))
        .subcommand(Command::new("exit").alias("quit").about("Leave the shell"))
}

fn environment() -> Command {
    Command::new("environment")
        .alias("env")
        .about("Manage environments")
        .subcommand(Command::new("list").about("List environments"))
        .subcommand(
            Command::new("use")
                .about("Use an environment in subsequent commands")
                .arg(id_arg("id", "Environment ID")),
        )
        .subcommand(
            Command::new("describe")
                .about("Describe an environment")
                .arg(id_arg("id", "Environment ID")),
        )
}

fn kafka() -> Command {
    Command::new("kafka")
        .about("Manage Apache Kafka")
        .subcommand(
            Command::new("cluster")
                .about("Manage Kafka clusters")
                .subcommand(
                    Command::new("list").about("List Kafka clusters").arg(
                        Arg::new("environment")
                            .long("environment")
                            .help("Environment ID"),
                    ),
                )
                .subcommand(
                    Command::new("describe")
                        .about("Describe a Kafka cluster")
                        .arg(id_arg("id", "Cluster ID")),
                )
                .subcommand(
                    Command::new("use")
                        .about("Use a Kafka cluster in subsequent commands")
                        .arg(id_arg("id", "Cluster ID")),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete Kafka clusters")
                        .arg(Arg::new("ids").required(true).num_args(1..).help("Cluster IDs")),
                ),
        )
        .subcommand(
            Command::new("topic")
                .about("Manage Kafka topics")
                .subcommand(
                    Command::new("list")
                        .about("List Kafka topics")
                        .arg(cluster_flag()),
                )
                .subcommand(
                    Command::new("describe")
                        .about("Describe a Kafka topic")
                        .arg(id_arg("name", "Topic name"))
                        .arg(cluster_flag()),
                )
                .subcommand(
                    Command::new("create")
                        .about("Create a Kafka topic")
                        .arg(id_arg("name", "Topic name"))
                        .arg(cluster_flag())
                        .arg(
                            Arg::new("partitions")
                                .long("partitions")
                                .help("Number of partitions"),
                        )
                        .arg(
                            Arg::new("if-not-exists")
                                .long("if-not-exists")
                                .action(ArgAction::SetTrue)
                                .help("Exit gracefully if the topic already exists"),
                        ),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete Kafka topics")
                        .arg(Arg::new("names").required(true).num_args(1..).help("Topic names"))
                        .arg(cluster_flag())
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .action(ArgAction::SetTrue)
                                .help("Skip the confirmation prompt"),
                        ),
                ),
        )
}

fn cluster_flag() -> Arg {
    Arg::new("cluster").long("cluster").help("Kafka cluster ID")
}

fn api_key() -> Command {
    Command::new("api-key")
        .about("Manage API keys")
        .subcommand(Command::new("list").about("List API keys").arg(resource_flag()))
        .subcommand(
            Command::new("create")
                .about("Create an API key")
                .arg(resource_flag())
                .arg(
                    Arg::new("service-account")
                        .long("service-account")
                        .help("Service account owning the key"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .help("Key description"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete API keys")
                .arg(Arg::new("keys").required(true).num_args(1..).help("API keys")),
        )
}

fn service_account() -> Command {
    Command::new("service-account")
        .about("Manage service accounts")
        .subcommand(Command::new("list").about("List service accounts"))
        .subcommand(
            Command::new("describe")
                .about("Describe a service account")
                .arg(id_arg("id", "Service account ID")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a service account")
                .arg(id_arg("id", "Service account ID")),
        )
        // Kept for old scripts, not shown in completion
        .subcommand(Command::new("update").hide(true).arg(id_arg("id", "Service account ID")))
}

/// Lists one kind of resource as suggestions
pub struct ResourceProvider {
    catalog: Arc<dyn Catalog>,
    kind: ResourceKind,
    children: Vec<String>,
}

impl ResourceProvider {
    /// Provider completing the argument of the given child commands
    pub fn new(catalog: Arc<dyn Catalog>, kind: ResourceKind, children: &[&str]) -> Self {
        Self {
            catalog,
            kind,
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Provider used only for flag values
    pub fn values(catalog: Arc<dyn Catalog>, kind: ResourceKind) -> Self {
        Self::new(catalog, kind, &[])
    }

    async fn fetch(&self) -> Result<Vec<Suggestion>> {
        let resources = self.catalog.list(self.kind).await?;
        if resources.is_empty() {
            return Ok(vec![Suggestion::message(format!("No {}s found", self.kind))]);
        }
        Ok(resources
            .into_iter()
            .map(|r| Suggestion::new(r.id, r.name))
            .collect())
    }
}

#[async_trait]
impl CommandProvider for ResourceProvider {
    fn completable_children(&self) -> Vec<String> {
        self.children.clone()
    }

    async fn suggestions(&self) -> Result<Vec<Suggestion>> {
        self.fetch().await
    }
}

#[async_trait]
impl FlagProvider for ResourceProvider {
    async fn suggestions(&self) -> Result<Vec<Suggestion>> {
        self.fetch().await
    }
}

/// Topic names for `kafka topic` children, plus cluster IDs for their `--cluster` flag
pub struct TopicProvider {
    topics: ResourceProvider,
    clusters: Arc<ResourceProvider>,
}

impl TopicProvider {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            topics: ResourceProvider::new(Arc::clone(&catalog), ResourceKind::Topic, &["describe", "delete"]),
            clusters: Arc::new(ResourceProvider::values(catalog, ResourceKind::Cluster)),
        }
    }
}

#[async_trait]
impl CommandProvider for TopicProvider {
    fn completable_children(&self) -> Vec<String> {
        self.topics.children.clone()
    }

    async fn suggestions(&self) -> Result<Vec<Suggestion>> {
        self.topics.fetch().await
    }
}

impl FlagAwareProvider for TopicProvider {
    fn flag_children(&self) -> Vec<(String, Vec<String>)> {
        let children = ["list", "describe", "create", "delete"];
        vec![("cluster".to_string(), children.iter().map(|c| c.to_string()).collect())]
    }

    fn flag_providers(&self) -> Vec<(String, Arc<dyn FlagProvider>)> {
        vec![("cluster".to_string(), Arc::clone(&self.clusters) as Arc<dyn FlagProvider>)]
    }
}

/// Attach providers and static tables for the `cloud` tree
pub fn register(engine: &CompletionEngine, catalog: Arc<dyn Catalog>) -> Result<()> {
    let plain = |kind, children: &[&str]| {
        Completable::plain(ResourceProvider::new(Arc::clone(&catalog), kind, children))
    };

    engine.register_command_at("environment", plain(ResourceKind::Environment, &["use", "describe"]))?;
    engine.register_command_at("kafka cluster", plain(ResourceKind::Cluster, &["describe", "use", "delete"]))?;
    engine.register_command_at("service-account", plain(ResourceKind::ServiceAccount, &["describe", "delete"]))?;
    engine.register_command_at("kafka topic", Completable::flag_aware(TopicProvider::new(Arc::clone(&catalog))))?;

    let values = |kind| -> Arc<dyn FlagProvider> { Arc::new(ResourceProvider::values(Arc::clone(&catalog), kind)) };
    engine.register_flag_at("kafka cluster list", "environment", values(ResourceKind::Environment))?;
    engine.register_flag_at("api-key list", "resource", values(ResourceKind::Cluster))?;
    engine.register_flag_at("api-key create", "resource", values(ResourceKind::Cluster))?;
    engine.register_flag_at("api-key create", "service-account", values(ResourceKind::ServiceAccount))?;

    engine.register_static_flag("output", output_formats(), LIST_COMMANDS);

    tracing::debug!(providers = engine.registry().len(), "completion providers registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompletionConfig;
    use crate::repl::completion::{Line, ShellCompleter};
    use crate::tree::CommandTree;
    use std::time::Duration;

    struct Wired {
        completer: ShellCompleter,
        _runtime: tokio::runtime::Runtime,
    }

    impl Wired {
        fn new(catalog: InMemoryCatalog) -> Self {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();
            let tree = Arc::new(CommandTree::from_clap(&command()));
            let engine = CompletionEngine::new(tree, runtime.handle().clone(), &CompletionConfig::default());
            register(&engine, Arc::new(catalog)).unwrap();
            Self {
                completer: ShellCompleter::new(Arc::new(engine)),
                _runtime: runtime,
            }
        }

        fn texts(&self, line: &str) -> Vec<String> {
            self.completer
                .complete(line, line.len())
                .1
                .into_iter()
                .map(|s| s.text)
                .collect()
        }

        fn prime(&self, line: &str) {
            self.completer.engine().complete(&Line::new(line, line.len()));
            self.completer.engine().wait_for_population();
        }
    }

    #[test]
    fn test_tree_is_valid_clap() {
        command().debug_assert();
    }

    #[test]
    fn test_top_level_commands() {
        let wired = Wired::new(InMemoryCatalog::new());
        assert_eq!(
            wired.texts(""),
            ["login", "logout", "environment", "kafka", "api-key", "service-account", "help", "exit"]
        );
    }

    #[test]
    fn test_hidden_subcommand_not_listed() {
        let wired = Wired::new(InMemoryCatalog::new());
        assert_eq!(wired.texts("service-account "), ["list", "describe", "delete"]);
    }

    #[test]
    fn test_cluster_ids_after_priming() {
        let wired = Wired::new(InMemoryCatalog::sample(Duration::from_millis(10)));
        assert!(wired.texts("kafka cluster describe ").is_empty());
        wired.prime("kafka cluster ");
        assert_eq!(wired.texts("kafka cluster describe "), ["lkc-12345", "lkc-67890"]);
    }

    #[test]
    fn test_topic_cluster_flag() {
        let wired = Wired::new(InMemoryCatalog::sample(Duration::ZERO));
        wired.prime("kafka topic ");
        assert_eq!(wired.texts("kafka topic list --cluster "), ["lkc-12345", "lkc-67890"]);
        assert_eq!(
            wired.texts("kafka topic describe "),
            ["orders.created", "orders.shipped", "clickstream"]
        );
    }

    #[test]
    fn test_output_formats_only_on_list() {
        let wired = Wired::new(InMemoryCatalog::new());
        assert_eq!(wired.texts("environment list -o "), ["human", "json", "yaml"]);
        assert!(wired.texts("environment describe --output ").is_empty());
    }

    #[test]
    fn test_empty_catalog_shows_message() {
        let wired = Wired::new(InMemoryCatalog::new());
        wired.prime("environment ");
        let (_, suggestions) = wired.completer.complete("environment use ", 16);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].description, "No environments found");
    }

    #[test]
    fn test_api_key_flags() {
        let wired = Wired::new(InMemoryCatalog::sample(Duration::ZERO));
        assert_eq!(wired.texts("api-key create --service-account "), ["sa-0a1b2", "sa-3c4d5"]);
        assert_eq!(
            wired.texts("api-key create --"),
            ["--resource", "--service-account", "--description", "--output", "--verbose"]
        );
    }
}
