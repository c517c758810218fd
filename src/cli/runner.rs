//! CLI runner - executes commands

use crate::auth::Credential;
use crate::cli::commands::{Cli, Commands};
use crate::cli::server::{serve, ServerConfig};
use crate::config::AppConfig;
use crate::constants::{ConstantSynchronizer, ConstantsFile, DocTreeSource};
use crate::error::{Error, Result};
use crate::fetcher::EndpointFetcher;
use crate::http::{HttpClient, HttpClientConfig};
use crate::snapshot::SnapshotUpdater;
use tracing::{debug, info};

/// Printed after the constants file has been refreshed
pub const CONSTANTS_UPDATED: &str = "Success, new endpoints have been registered!";

/// Printed after a purge
pub const PURGED: &str = "Success";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = AppConfig::load_or_default(self.cli.config.as_deref())?;
        debug!("Configuration: {:?}", config);

        match &self.cli.command {
            Commands::Server { port } => {
                let port = port.unwrap_or(config.server.port);
                let server = ServerConfig {
                    snapshot_dir: config.paths.snapshot_dir.clone(),
                };
                serve(server, port).await
            }
            Commands::Update { key } => {
                let updater = self.updater(&config, key.as_deref())?;
                let constants = ConstantsFile::load(&config.paths.constants).await?;
                let report = updater.update_all(&constants).await?;
                println!("{report}");
                Ok(())
            }
            Commands::UpdateSome { key, names } => {
                let updater = self.updater(&config, Some(key.as_str()))?;
                let report = updater.update_endpoints(names).await?;
                println!("{report}");
                Ok(())
            }
            Commands::UpdateConstant {
                doc_url,
                from_tree,
                repo,
                branch,
                prefix,
            } => {
                let sync = self.synchronizer(&config)?;
                if *from_tree {
                    let mut source = DocTreeSource::from_settings(sync.settings());
                    if let Some(repo) = repo {
                        source.repo_url.clone_from(repo);
                    }
                    if let Some(branch) = branch {
                        source.branch.clone_from(branch);
                    }
                    if let Some(prefix) = prefix {
                        source.prefix.clone_from(prefix);
                    }
                    sync.sync_from_tree(&source).await?;
                } else {
                    sync.sync_from_spec(doc_url.as_deref()).await?;
                }
                println!("{CONSTANTS_UPDATED}");
                Ok(())
            }
            Commands::Reinstall { key, doc_url } => {
                let updater = self.updater(&config, key.as_deref())?;
                let sync = self.synchronizer(&config)?;

                info!("Reinstalling {}", config.paths.snapshot_dir.display());
                config.paths.snapshot_paths().remove_all().await?;
                let constants = sync.sync_from_spec(doc_url.as_deref()).await?;
                let report = updater.update_all(&constants).await?;
                println!("{report}");
                Ok(())
            }
            Commands::Purge => {
                config.paths.snapshot_paths().remove_all().await?;
                println!("{PURGED}");
                Ok(())
            }
        }
    }

    /// Build an updater using the key from the command line or the config
    fn updater(
        &self,
        config: &AppConfig,
        key: Option<&str>,
    ) -> Result<SnapshotUpdater<EndpointFetcher>> {
        let credential = resolve_key(key, config.api.key.as_ref().map(Credential::expose))?;
        let fetcher = EndpointFetcher::new(
            config.api.http_config(),
            credential,
            config.api.key_placement.clone(),
        )?
        .with_diagnostics(config.api.diagnostics || self.cli.verbose);

        Ok(SnapshotUpdater::new(
            fetcher,
            config.paths.snapshot_paths(),
            config.updater.clone().build(),
        ))
    }

    /// Build a synchronizer writing the configured constants file
    fn synchronizer(&self, config: &AppConfig) -> Result<ConstantSynchronizer> {
        let mut http = HttpClientConfig::builder();
        if let Some(agent) = &config.api.user_agent {
            http = http.user_agent(agent);
        }
        if let Some(secs) = config.api.timeout_secs {
            http = http.timeout(std::time::Duration::from_secs(secs));
        }
        let client = HttpClient::with_config(http.build())?;

        Ok(ConstantSynchronizer::new(
            client,
            &config.paths.constants,
            config.sync.clone(),
        ))
    }
}

/// Pick the command-line key over the configured one
fn resolve_key(cli_key: Option<&str>, config_key: Option<&str>) -> Result<Credential> {
    cli_key
        .or(config_key)
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(Credential::new)
        .ok_or(Error::MissingKey)
}
