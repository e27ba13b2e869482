//! # CLI Layer
//!
//! The only code that:
//! - reads the process environment and arguments
//! - installs the log subscriber
//! - writes to stdout
//!
//! ## Flow
//!
//! 1. **Parse** arguments with clap
//! 2. **Logging**: `TW_LOG` if set, else `--log-level`; always to stderr
//! 3. **Configure**: flags over environment over config file
//! 4. **Dispatch** to the [`TowerApp`] method for the command
//! 5. **Render** the response in the requested format and print it
//!
//! Errors travel back to `main`, which prints them and exits with status 1.

use super::setup::{
    ActionsCommands, Cli, CollaboratorsCommands, Commands, ComputeEnvsCommands, LabelsCommands,
    MembersCommands, OrganizationsCommands, PipelinesCommands, PrimaryCommands, RunsCommands,
    TeamsCommands, WorkspacesCommands,
};
use anyhow::Result;
use clap::Parser;
use console::Term;
use towerapp::api::TowerApp;
use towerapp::config::{ConfigOverrides, TowerConfig};
use towerapp::platform::PlatformApi;
use towerapp::render::{render, RenderOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TW_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let overrides = ConfigOverrides {
        endpoint: cli.url.clone(),
        access_token: cli.access_token.clone(),
    };
    let config = TowerConfig::load(&overrides, |key| std::env::var(key).ok())?;
    debug!(endpoint = %config.endpoint, "configuration loaded");

    let app = TowerApp::from_config(&config)?;
    let options = RenderOptions::new(cli.output.into())
        .verbose(cli.verbose)
        .use_color(!cli.no_color && Term::stdout().features().colors_supported());

    let output = dispatch(&app, &cli.command, &options)?;
    print!("{}", output);
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs one command and renders its response.
fn dispatch<P: PlatformApi>(
    app: &TowerApp<P>,
    command: &Commands,
    options: &RenderOptions,
) -> towerapp::error::Result<String> {
    match command {
        Commands::Info => render(&app.info()?, options),

        Commands::Organizations(cmd) => match cmd {
            OrganizationsCommands::List => render(&app.list_organizations()?, options),
            OrganizationsCommands::View { organization } => render(
                &app.view_organization(organization.organization.as_deref())?,
                options,
            ),
        },

        Commands::Workspaces(cmd) => match cmd {
            WorkspacesCommands::List { organization } => render(
                &app.list_workspaces(organization.organization.as_deref())?,
                options,
            ),
            WorkspacesCommands::View { workspace } => {
                render(&app.view_workspace(workspace.workspace.as_deref())?, options)
            }
        },

        Commands::Members(MembersCommands::List {
            organization,
            pagination,
            filter,
        }) => render(
            &app.list_members(
                organization.organization.as_deref(),
                &pagination.pagination(),
                filter.as_deref(),
            )?,
            options,
        ),

        Commands::Collaborators(CollaboratorsCommands::List {
            organization,
            pagination,
        }) => render(
            &app.list_collaborators(organization.organization.as_deref(), &pagination.pagination())?,
            options,
        ),

        Commands::Teams(TeamsCommands::List {
            organization,
            pagination,
        }) => render(
            &app.list_teams(organization.organization.as_deref(), &pagination.pagination())?,
            options,
        ),

        Commands::ComputeEnvs(cmd) => match cmd {
            ComputeEnvsCommands::List { workspace } => {
                render(&app.list_compute_envs(workspace.workspace.as_deref())?, options)
            }
            ComputeEnvsCommands::View { workspace, name } => render(
                &app.view_compute_env(workspace.workspace.as_deref(), name.as_deref())?,
                options,
            ),
            ComputeEnvsCommands::Export {
                workspace,
                name,
                file,
            } => render(
                &app.export_compute_env(
                    workspace.workspace.as_deref(),
                    name.as_deref(),
                    file.as_deref(),
                )?,
                options,
            ),
            ComputeEnvsCommands::Primary(PrimaryCommands::Get { workspace }) => render(
                &app.get_primary_compute_env(workspace.workspace.as_deref())?,
                options,
            ),
            ComputeEnvsCommands::Primary(PrimaryCommands::Set { workspace, name }) => render(
                &app.set_primary_compute_env(workspace.workspace.as_deref(), name)?,
                options,
            ),
        },

        Commands::Pipelines(cmd) => match cmd {
            PipelinesCommands::List {
                workspace,
                pagination,
                filter,
                show_labels,
            } => render(
                &app.list_pipelines(
                    workspace.workspace.as_deref(),
                    &pagination.pagination(),
                    filter.as_deref(),
                    *show_labels,
                )?,
                options,
            ),
            PipelinesCommands::View { workspace, name } => {
                render(&app.view_pipeline(workspace.workspace.as_deref(), name)?, options)
            }
            PipelinesCommands::Labels(args) => render(
                &app.pipeline_labels(
                    args.workspace.workspace.as_deref(),
                    &args.name,
                    args.operation.into(),
                    &args.labels,
                )?,
                options,
            ),
        },

        Commands::Actions(cmd) => match cmd {
            ActionsCommands::List { workspace } => {
                render(&app.list_actions(workspace.workspace.as_deref())?, options)
            }
            ActionsCommands::Labels(args) => render(
                &app.action_labels(
                    args.workspace.workspace.as_deref(),
                    &args.name,
                    args.operation.into(),
                    &args.labels,
                )?,
                options,
            ),
        },

        Commands::Labels(LabelsCommands::List {
            workspace,
            pagination,
            label_type,
            filter,
        }) => render(
            &app.list_labels(
                workspace.workspace.as_deref(),
                (*label_type).into(),
                &pagination.pagination(),
                filter.as_deref(),
            )?,
            options,
        ),

        Commands::Runs(cmd) => match cmd {
            RunsCommands::List {
                workspace,
                pagination,
                filter,
            } => render(
                &app.list_runs(
                    workspace.workspace.as_deref(),
                    &pagination.pagination(),
                    filter.as_deref(),
                )?,
                options,
            ),
            RunsCommands::Metrics { workspace, id } => {
                render(&app.run_metrics(workspace.workspace.as_deref(), id)?, options)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use towerapp::config::EnvDefaults;
    use towerapp::error::TowerError;
    use towerapp::platform::memory::fixtures::{acme, ACME_WS_ID};
    use towerapp::platform::memory::InMemoryPlatform;
    use towerapp::render::OutputFormat;

    fn app() -> TowerApp<InMemoryPlatform> {
        TowerApp::new(acme(), "https://tower.example/api", EnvDefaults::default())
    }

    fn run_args(app: &TowerApp<InMemoryPlatform>, args: &[&str]) -> towerapp::error::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("tw").chain(args.iter().copied()))
            .map_err(|e| TowerError::InvalidArgument(e.to_string()))?;
        let options = RenderOptions::new(cli.output.into()).verbose(cli.verbose);
        dispatch(app, &cli.command, &options)
    }

    #[test]
    fn test_collaborators_end_to_end() {
        let app = app();
        let out = run_args(&app, &["collaborators", "list", "-o", "27736513644467"]).unwrap();
        assert_eq!(
            out,
            "  Collaborators for [27736513644467] organization:\n\
             \n    Member ID | Username | Email\
             \n    ----------+----------+--------------------\
             \n    4         | barbara  | barbara@example.com\
             \n    12        | ken      | ken@example.com\
             \n    30        | linus    | linus@example.com\
             \n\
             \n    Showing 3 of 3 (offset 0)\n"
        );
        let request = app.platform().last_page_request().unwrap();
        assert_eq!(request.max.limit(), Some(100));
        assert_eq!(request.offset, 0);
    }

    #[test]
    fn test_json_output() {
        let app = app();
        let out = run_args(
            &app,
            &["collaborators", "list", "-o", "27736513644467", "--output", "json"],
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["collaborators"][0]["memberId"], 30);
        assert_eq!(value["collaborators"][0]["userName"], "linus");
    }

    #[test]
    fn test_labels_command_reaches_platform() {
        let app = app();
        let out = run_args(
            &app,
            &["pipelines", "labels", "-w", "acme/rnaseq", "-n", "sarek", "--operation", "add", "prod"],
        )
        .unwrap();
        assert!(out.contains("Labels updated on pipeline 'sarek' at [acme / rnaseq] workspace:"));
        assert_eq!(
            app.platform().pipeline_labels(Some(ACME_WS_ID), 43),
            vec!["prod"]
        );
    }

    #[test]
    fn test_missing_primary_is_an_error() {
        let app = TowerApp::new(InMemoryPlatform::new(), "http://x", EnvDefaults::default());
        let err = run_args(&app, &["compute-envs", "view"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No primary compute environment found at [user] workspace"
        );
    }

    #[test]
    fn test_output_format_mapping() {
        let cli = Cli::try_parse_from(["tw", "info", "--output", "yaml"]).unwrap();
        assert_eq!(OutputFormat::from(cli.output), OutputFormat::Yaml);
    }
}
