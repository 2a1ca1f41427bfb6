use crate::reporter::ConsoleReporter;
use bunnyflow_cloud::{CloudError, DeployConfig, Deployer, RetryConfig};
use bunnyflow_cloud_bunny::{BunnyApi, ClientConfig};
use bunnyflow_core::{DeploymentInputs, RawInputs};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Repository checkout containing the site
    #[arg(long, env = "BUNNYFLOW_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Content directory, relative to the workspace
    #[arg(short, long, env = "BUNNYFLOW_DIRECTORY")]
    pub directory: PathBuf,

    /// Branch being deployed (a full ref such as refs/heads/x is accepted)
    #[arg(short, long, env = "BUNNYFLOW_BRANCH_CURRENT")]
    pub branch: String,

    /// Branch served from the bare subdomain
    #[arg(long, env = "BUNNYFLOW_BRANCH_MAIN", default_value = "main")]
    pub main_branch: String,

    /// bunny.net account API key
    #[arg(long, env = "BUNNY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Id of the bunny.net DNS zone to publish under
    #[arg(long, env = "BUNNY_DNS_ZONE_ID")]
    pub dns_zone_id: i64,

    /// Subdomain under the DNS zone (empty for the zone apex)
    #[arg(short, long, env = "BUNNYFLOW_SUBDOMAIN")]
    pub subdomain: Option<String>,

    /// Process at most N files per sync stage (0 = no limit)
    #[arg(long, env = "BUNNYFLOW_DEBUG_LIMIT")]
    pub debug_limit: Option<usize>,

    /// File operations in flight per sync stage
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Overall deadline for the deployment in seconds
    #[arg(long, default_value_t = 1800)]
    pub deadline_secs: u64,

    /// Retries for throttled or dropped requests
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Region for newly created storage zones
    #[arg(long, default_value = "DE")]
    pub storage_region: String,
}

impl DeployArgs {
    fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            workspace: self.workspace.clone(),
            directory: self.directory.clone(),
            branch_current: self.branch.clone(),
            branch_main: self.main_branch.clone(),
            api_key: self.api_key.clone(),
            dns_zone_id: self.dns_zone_id,
            dns_subdomain: self.subdomain.clone(),
            debug_limit: self.debug_limit,
        }
    }

    fn client_config(&self, api_key: &str) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            retry: RetryConfig {
                max_attempts: self.retries.saturating_add(1),
                ..RetryConfig::default()
            },
            ..ClientConfig::new(api_key)
        }
    }

    fn deploy_config(&self) -> DeployConfig {
        DeployConfig {
            concurrency: self.concurrency.max(1),
            storage_region: self.storage_region.trim().to_uppercase(),
            ..DeployConfig::default()
        }
    }
}

/// Stop at the next checkpoint when Ctrl-C is pressed
fn install_interrupt_handler(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!(
                "{}",
                "Interrupted, stopping after in-flight requests...".yellow()
            );
            shutdown.store(true, Ordering::SeqCst);
        }
    });
}

pub async fn handle(args: DeployArgs) -> anyhow::Result<()> {
    let inputs = DeploymentInputs::new(args.raw_inputs())?;
    tracing::debug!("Inputs: {:?}", inputs);

    println!("{}", "Starting deployment...".blue().bold());
    println!("  Content: {}", inputs.content_root().display().to_string().cyan());
    println!("  Branch:  {}", inputs.branch_current().cyan());
    if let Some(limit) = inputs.debug_limit() {
        println!(
            "  {}",
            format!("Debug limit: {} files per stage", limit).yellow()
        );
    }
    println!();

    let api = BunnyApi::new(args.client_config(inputs.api_key())).map_err(CloudError::from)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(Arc::clone(&shutdown));

    let deployer = Deployer::new(Arc::new(api))
        .with_reporter(Arc::new(ConsoleReporter::new()))
        .with_config(args.deploy_config())
        .with_shutdown(shutdown);

    let deadline = Duration::from_secs(args.deadline_secs.max(1));
    let report = match tokio::time::timeout(deadline, deployer.run(&inputs)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(CloudError::Timeout(format!(
                "deployment did not finish within {}s",
                deadline.as_secs()
            ))
            .into());
        }
    };

    println!();
    println!("{}", "✓ Deployment complete".green().bold());
    println!("  URL:     {}", format!("https://{}", report.identity.deployment_name).cyan());
    println!("  CNAME:   {}", report.cname_target);
    println!("  Zone:    {}", report.storage_zone);
    println!("  Files:   {}", report.sync);
    println!(
        "  Created: {} resource(s) in {:.1}s",
        report.created(),
        report.duration_ms as f64 / 1000.0
    );

    Ok(())
}
