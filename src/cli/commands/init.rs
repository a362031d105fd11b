//! Init command implementation
//!
//! Writes a sample configuration file with a freshly generated payload
//! encryption key.

use crate::adapters::crypto::generate_key_base64;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "gitport.toml")]
    pub output: String,

    /// Include explanatory comments and a sample manifest entry
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Gitport configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = generate_config(&generate_key_base64(), self.with_examples);

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your remote host and account", self.output);
                println!("  2. Set GITPORT_REMOTE_TOKEN in your environment or .env file");
                println!("  3. Keep the generated encryption key private");
                println!("  4. Validate configuration: gitport validate-config");
                println!("  5. Run export: gitport export --space <ID>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }
}

/// Renders the sample configuration around `key`
fn generate_config(key: &str, with_examples: bool) -> String {
    let mut out = String::new();

    out.push_str("# Gitport Configuration File\n");
    if with_examples {
        out.push_str(
            r#"#
# Values written as ${VAR} are read from the environment when the file is
# loaded. Any value can also be overridden with GITPORT_<SECTION>_<KEY>,
# e.g. GITPORT_REMOTE_BASE_URL or GITPORT_JOBS_RETRY_DELAY_MS.
"#,
        );
    }

    out.push_str(
        r#"
[application]
log_level = "info"

[remote]
base_url = "https://git.example.com"
timeout_seconds = 30
tls_verify = true

[target]
account_id = "my-account"
org_identifier = "default"
project_identifier = "migration"
token = "${GITPORT_REMOTE_TOKEN}"

[encryption]
"#,
    );
    if with_examples {
        out.push_str("# 256-bit AES key, base64. Generated by `gitport init`.\n");
    }
    out.push_str(&format!("key = \"{key}\"\n"));

    out.push_str(
        r#"
[git]
repos_root = "/srv/git/repositories"
git_binary = "git"

[jobs]
retry_delay_ms = 1000
cancel_grace_seconds = 30
poll_interval_ms = 500

[logging]
local_enabled = true
local_path = "/var/log/gitport"
local_rotation = "daily"
"#,
    );

    if with_examples {
        out.push_str(
            r#"
# Repositories are listed in a separate manifest (repositories.toml):
#
# [[repositories]]
# id = 42
# parent_id = 7
# uid = "svc-a"
# git_uid = "7/svc-a.git"
# default_branch = "main"
# description = "Service A"
# is_public = false
"#,
        );
    }

    out
}
