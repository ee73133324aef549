use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, bail};
use chrono::{Duration, NaiveDate};
use clap::{Args, Parser, Subcommand};
use hr_client::{ClientSettings, DEFAULT_API_URL, RetryPolicy};
use hr_types::{ApprovalTab, EmployeeStatus, PayrollFilter, UserProfile};
use hr_web::{SessionVerifier, WebServerConfig};
use secrecy::SecretString;
use session_store::{SessionSigner, SessionStore, StorageType, default_store_path, token::DEFAULT_SESSION_TTL_HOURS};

/// Longest session lifetime accepted on the command line.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

/// `hours` as a session lifetime; out-of-range values are an error.
pub fn session_ttl(hours: i64) -> anyhow::Result<Duration> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        bail!("session ttl must be between 1 and {} hours, got {}", MAX_SESSION_TTL_HOURS, hours);
    }
    Duration::try_hours(hours).with_context(|| format!("session ttl of {} hours is out of range", hours))
}

#[derive(Debug, Parser)]
#[command(name = "hrdesk", about = "HR Desk web gateway and terminal client")]
pub struct Cli {
    /// Base URL of the HR backend REST API
    #[arg(long, env = "HRDESK_API_URL", default_value = DEFAULT_API_URL, global = true, value_name = "URL")]
    pub api_url: String,
    /// Session file holding the auth token and cached profile
    #[arg(long, env = "HRDESK_STORE", global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,
    /// Attempts per read request; only transport errors and 5xx responses are retried
    #[arg(long, default_value_t = 1, global = true, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub retries: u32,
    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(StorageType::File(self.store_path()).open())
    }

    pub fn client_settings(&self) -> anyhow::Result<ClientSettings> {
        let settings = ClientSettings::new(&self.api_url).with_context(|| format!("invalid --api-url {}", self.api_url))?;
        Ok(settings.with_retry(RetryPolicy::attempts(self.retries)))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the guarded web gateway
    Serve(WebArgs),
    /// Inspect or write the stored session
    Session {
        #[command(subcommand)]
        cmd: SessionCmd,
    },
    /// Clear the stored session
    Logout,
    /// Show the dashboard summary
    Dashboard,
    /// Employee records
    Employees {
        #[command(subcommand)]
        cmd: EmployeesCmd,
    },
    /// Daily attendance
    Attendance {
        #[command(subcommand)]
        cmd: AttendanceCmd,
    },
    /// Leave and expense approval requests
    Approvals {
        #[command(subcommand)]
        cmd: ApprovalsCmd,
    },
    /// Payroll records, exports and payslips
    Payroll {
        #[command(subcommand)]
        cmd: PayrollCmd,
    },
    /// KPI scores
    Kpi {
        #[command(subcommand)]
        cmd: KpiCmd,
    },
}

#[derive(Debug, Clone, Args)]
pub struct WebArgs {
    /// Address to bind the gateway to
    #[arg(long, default_value = "127.0.0.1", help_heading = "Web Gateway")]
    pub bind: String,
    /// Port to listen on
    #[arg(long, default_value_t = 8080, help_heading = "Web Gateway")]
    pub port: u16,
    /// Directory of built front-end assets; placeholder pages are served when omitted
    #[arg(long, value_name = "DIR", help_heading = "Web Gateway")]
    pub static_dir: Option<PathBuf>,
    /// Key used to sign and verify session tokens
    #[arg(long, env = "HRDESK_SESSION_SECRET", hide_env_values = true, help_heading = "Web Gateway")]
    pub session_secret: Option<String>,
    /// Lifetime of issued session tokens, in hours
    #[arg(long, default_value_t = DEFAULT_SESSION_TTL_HOURS, value_parser = clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_HOURS), help_heading = "Web Gateway")]
    pub session_ttl_hours: i64,
    /// Accept any non-empty auth cookie without checking a signature; overrides --session-secret
    #[arg(long, help_heading = "Web Gateway")]
    pub presence_only: bool,
    /// Mark the auth cookie Secure (serve behind HTTPS)
    #[arg(long, help_heading = "Web Gateway")]
    pub secure_cookies: bool,
}

impl WebArgs {
    pub fn to_config(&self) -> anyhow::Result<WebServerConfig> {
        let verifier = match (&self.session_secret, self.presence_only) {
            (_, true) => SessionVerifier::PresenceOnly,
            (Some(secret), false) => {
                let signer = SessionSigner::new(SecretString::from(secret.clone()), session_ttl(self.session_ttl_hours)?)
                    .context("invalid session secret")?;
                SessionVerifier::Signed(Arc::new(signer))
            }
            (None, false) => bail!("either --session-secret (or HRDESK_SESSION_SECRET) or --presence-only is required"),
        };
        Ok(WebServerConfig {
            bind: self.bind.clone(),
            port: self.port,
            static_dir: self.static_dir.clone(),
            verifier,
            secure_cookies: self.secure_cookies,
        })
    }
}

/// The signed-in user, given as flags.
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Backend user id
    #[arg(long = "user-id", value_name = "ID")]
    pub id: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Display name
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
}

impl ProfileArgs {
    /// `None` when no profile flag was given.
    pub fn to_profile(&self) -> Option<UserProfile> {
        if self.id.is_none() && self.email.is_none() && self.name.is_none() && self.role.is_none() {
            return None;
        }
        Some(UserProfile {
            id: self.id.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            role: self.role.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum SessionCmd {
    /// Store a token issued by the backend at login
    Set {
        token: String,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Show who is signed in
    Show,
    /// Mint a signed session token for a user
    Issue {
        /// Signing key shared with `hrdesk serve`
        #[arg(long, env = "HRDESK_SESSION_SECRET", hide_env_values = true)]
        session_secret: String,
        #[arg(long, default_value_t = DEFAULT_SESSION_TTL_HOURS, value_parser = clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_HOURS))]
        ttl_hours: i64,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Also store the token and profile as the current session
        #[arg(long)]
        save: bool,
    },
}

/// Employee form fields; on update, omitted fields keep their current value.
#[derive(Debug, Clone, Default, Args)]
pub struct EmployeeFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    /// Monthly salary
    #[arg(long)]
    pub salary: Option<String>,
    /// Join date, YYYY-MM-DD
    #[arg(long)]
    pub join_date: Option<String>,
    /// active or inactive
    #[arg(long)]
    pub status: Option<String>,
}

impl EmployeeFields {
    pub fn apply(&self, draft: &mut hr_types::EmployeeDraft) {
        let fields = [
            (&self.name, &mut draft.name),
            (&self.email, &mut draft.email),
            (&self.position, &mut draft.position),
            (&self.department, &mut draft.department),
            (&self.salary, &mut draft.salary),
            (&self.join_date, &mut draft.join_date),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        if let Some(status) = &self.status {
            draft.status = EmployeeStatus::from(status.as_str());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum EmployeesCmd {
    /// List employees, optionally filtered by name, email or position
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: String,
    },
    Create {
        #[command(flatten)]
        fields: EmployeeFields,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AttendanceCmd {
    /// Records and summary for a day (default: today, UTC)
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Flip a record between present and absent
    Toggle {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ApprovalsCmd {
    List {
        /// pending, approved, rejected or all
        #[arg(long, default_value = "pending")]
        tab: ApprovalTab,
    },
    Approve {
        id: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Reject {
        id: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PayrollCmd {
    List {
        /// all, pending or paid
        #[arg(long, default_value = "all")]
        status: PayrollFilter,
    },
    Show {
        id: String,
    },
    /// Create one payroll entry
    Create {
        #[arg(long = "employee", value_name = "ID")]
        employee_id: String,
        /// Pay period, e.g. 2024-06
        #[arg(long)]
        period: String,
        #[arg(long)]
        basic: String,
        #[arg(long, default_value = "")]
        bonuses: String,
        #[arg(long, default_value = "")]
        deductions: String,
    },
    /// Generate a period's payroll for several active employees
    Bulk {
        #[arg(long)]
        period: String,
        /// Employee to include; repeat for several
        #[arg(long = "employee", value_name = "ID", conflicts_with = "all")]
        employees: Vec<String>,
        /// Include every active employee
        #[arg(long)]
        all: bool,
    },
    MarkPaid {
        id: String,
    },
    /// Download the CSV export
    Export {
        #[arg(long, default_value = ".", value_name = "DIR")]
        out: PathBuf,
    },
    /// Download a payslip PDF
    Slip {
        id: String,
        #[arg(long, default_value = ".", value_name = "DIR")]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum KpiCmd {
    List,
    /// Set a KPI score
    Set {
        id: String,
        score: String,
    },
}
