use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use towerapp::labels::LabelOperation;
use towerapp::model::LabelType;
use towerapp::pagination::Pagination;
use towerapp::render::OutputFormat;

/// Version string with git hash and commit date for non-release builds.
/// Releases: "v0.3.0". Dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30".
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "tw",
    bin_name = "tw",
    version = get_version(),
    disable_help_subcommand = true,
    about = "Manage workspaces, compute environments and pipelines on the workflow platform",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Platform API endpoint [env: TOWER_API_ENDPOINT]
    #[arg(short = 'u', long = "url", global = true, help_heading = "Options")]
    pub url: Option<String>,

    /// Access token [env: TOWER_ACCESS_TOKEN]
    #[arg(short = 't', long, global = true, help_heading = "Options")]
    pub access_token: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputArg::Table, global = true, help_heading = "Options")]
    pub output: OutputArg,

    /// Show optional columns
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Log level for stderr diagnostics (overridden by TW_LOG)
    #[arg(long, default_value = "warn", global = true, help_heading = "Options")]
    pub log_level: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    #[value(alias = "console")]
    Table,
    Json,
    #[value(alias = "yml")]
    Yaml,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Table => OutputFormat::Table,
            OutputArg::Json => OutputFormat::Json,
            OutputArg::Yaml => OutputFormat::Yaml,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    #[default]
    Set,
    Add,
    #[value(alias = "delete")]
    Remove,
}

impl From<OperationArg> for LabelOperation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Set => LabelOperation::Set,
            OperationArg::Add => LabelOperation::Add,
            OperationArg::Remove => LabelOperation::Remove,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LabelTypeArg {
    Simple,
    Resource,
    #[default]
    All,
}

impl From<LabelTypeArg> for LabelType {
    fn from(arg: LabelTypeArg) -> Self {
        match arg {
            LabelTypeArg::Simple => LabelType::Simple,
            LabelTypeArg::Resource => LabelType::Resource,
            LabelTypeArg::All => LabelType::All,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceArg {
    /// Workspace id or ORGANIZATION/WORKSPACE [env: TOWER_WORKSPACE_ID, TOWER_WORKSPACE_NAME]
    #[arg(short = 'w', long = "workspace")]
    pub workspace: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OrganizationArg {
    /// Organization id or name [env: TOWER_ORGANIZATION_ID, TOWER_ORGANIZATION_NAME]
    #[arg(short = 'o', long = "organization")]
    pub organization: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PaginationArgs {
    /// Page number, starting at 1
    #[arg(long, conflicts_with = "offset")]
    pub page: Option<u32>,

    /// Rows to skip
    #[arg(long)]
    pub offset: Option<u64>,

    /// Page size (default 100)
    #[arg(long)]
    pub max: Option<u32>,

    /// Fetch everything
    #[arg(long)]
    pub no_max: bool,
}

impl PaginationArgs {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            offset: self.offset,
            max: self.max,
            no_max: self.no_max,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the endpoint and the authenticated user
    Info,

    /// Organizations the caller belongs to
    #[command(subcommand, alias = "orgs")]
    Organizations(OrganizationsCommands),

    /// Workspaces
    #[command(subcommand)]
    Workspaces(WorkspacesCommands),

    /// Organization members
    #[command(subcommand)]
    Members(MembersCommands),

    /// Organization collaborators
    #[command(subcommand)]
    Collaborators(CollaboratorsCommands),

    /// Organization teams
    #[command(subcommand)]
    Teams(TeamsCommands),

    /// Compute environments
    #[command(subcommand)]
    ComputeEnvs(ComputeEnvsCommands),

    /// Pipelines of the launchpad
    #[command(subcommand)]
    Pipelines(PipelinesCommands),

    /// Pipeline actions
    #[command(subcommand)]
    Actions(ActionsCommands),

    /// Workspace labels
    #[command(subcommand)]
    Labels(LabelsCommands),

    /// Pipeline runs
    #[command(subcommand)]
    Runs(RunsCommands),
}

#[derive(Subcommand, Debug)]
pub enum OrganizationsCommands {
    /// List organizations
    List,
    /// Describe an organization
    View {
        #[command(flatten)]
        organization: OrganizationArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkspacesCommands {
    /// List workspaces, of one organization when given
    List {
        #[command(flatten)]
        organization: OrganizationArg,
    },
    /// Describe a workspace
    View {
        #[command(flatten)]
        workspace: WorkspaceArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum MembersCommands {
    /// List organization members
    List {
        #[command(flatten)]
        organization: OrganizationArg,
        #[command(flatten)]
        pagination: PaginationArgs,
        /// Only members whose name contains this text
        #[arg(short = 'f', long)]
        filter: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CollaboratorsCommands {
    /// List organization collaborators
    List {
        #[command(flatten)]
        organization: OrganizationArg,
        #[command(flatten)]
        pagination: PaginationArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum TeamsCommands {
    /// List organization teams
    List {
        #[command(flatten)]
        organization: OrganizationArg,
        #[command(flatten)]
        pagination: PaginationArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ComputeEnvsCommands {
    /// List compute environments
    List {
        #[command(flatten)]
        workspace: WorkspaceArg,
    },
    /// Describe a compute environment (the primary one by default)
    View {
        #[command(flatten)]
        workspace: WorkspaceArg,
        /// Compute environment id or name
        #[arg(short = 'n', long)]
        name: Option<String>,
    },
    /// Export a compute environment definition as JSON
    Export {
        #[command(flatten)]
        workspace: WorkspaceArg,
        /// Compute environment id or name
        #[arg(short = 'n', long)]
        name: Option<String>,
        /// Destination file; printed when omitted
        file: Option<PathBuf>,
    },
    /// Show or change the primary compute environment
    #[command(subcommand)]
    Primary(PrimaryCommands),
}

#[derive(Subcommand, Debug)]
pub enum PrimaryCommands {
    /// Show the primary compute environment
    Get {
        #[command(flatten)]
        workspace: WorkspaceArg,
    },
    /// Make a compute environment the primary one
    Set {
        #[command(flatten)]
        workspace: WorkspaceArg,
        /// Compute environment id or name
        #[arg(short = 'n', long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PipelinesCommands {
    /// List pipelines
    List {
        #[command(flatten)]
        workspace: WorkspaceArg,
        #[command(flatten)]
        pagination: PaginationArgs,
        /// Only pipelines whose name contains this text
        #[arg(short = 'f', long)]
        filter: Option<String>,
        /// Add a labels column
        #[arg(long)]
        show_labels: bool,
    },
    /// Describe a pipeline
    View {
        #[command(flatten)]
        workspace: WorkspaceArg,
        /// Pipeline name or id
        #[arg(short = 'n', long)]
        name: String,
    },
    /// Set, add or remove pipeline labels
    Labels(LabelsArgs),
}

#[derive(Subcommand, Debug)]
pub enum ActionsCommands {
    /// List actions
    List {
        #[command(flatten)]
        workspace: WorkspaceArg,
    },
    /// Set, add or remove action labels
    Labels(LabelsArgs),
}

#[derive(Args, Debug)]
pub struct LabelsArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArg,

    /// Resource name or id
    #[arg(short = 'n', long)]
    pub name: String,

    /// How the given labels combine with the current ones
    #[arg(long, value_enum, default_value_t = OperationArg::Set)]
    pub operation: OperationArg,

    /// Label names, space or comma separated
    pub labels: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum LabelsCommands {
    /// List workspace labels
    List {
        #[command(flatten)]
        workspace: WorkspaceArg,
        #[command(flatten)]
        pagination: PaginationArgs,
        /// Label type
        #[arg(long = "type", value_enum, default_value_t = LabelTypeArg::All)]
        label_type: LabelTypeArg,
        /// Only labels whose name contains this text
        #[arg(short = 'f', long)]
        filter: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RunsCommands {
    /// List pipeline runs
    List {
        #[command(flatten)]
        workspace: WorkspaceArg,
        #[command(flatten)]
        pagination: PaginationArgs,
        /// Only runs whose name contains this text
        #[arg(short = 'f', long)]
        filter: Option<String>,
    },
    /// Resource usage of a run, per process
    Metrics {
        #[command(flatten)]
        workspace: WorkspaceArg,
        /// Run id
        #[arg(short = 'i', long)]
        id: String,
    },
}
