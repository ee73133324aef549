//! Drives the page controllers from the command line.
//!
//! Each command runs the same action the dashboard page would, so toasts and
//! reloads behave identically; the result is printed to stdout and toasts go
//! to stderr. `Ok(false)` means the action ran but failed (its toast says why).

use std::{path::Path, sync::Arc};

use anyhow::{Context, bail};
use chrono::{DateTime, NaiveDate, Utc};
use hr_client::{
    ApiClient, PageContext, pages::{
        ApprovalsPage, AttendancePage, BulkGeneratePage, DashboardPage, Download, EmployeeDetailPage, EmployeeFormPage, EmployeesPage, KpiPage, PayrollCreatePage, PayrollDetailPage, PayrollPage
    }
};
use hr_types::{
    ApprovalDecision, ApprovalTab, auth::greeting, employees::date_input_value, money::{format_amount, format_currency}
};
use hr_web::run_web_server;
use secrecy::SecretString;
use session_store::{SessionSigner, SessionStore};
use tracing::{debug, warn};

use crate::{
    cli::{ApprovalsCmd, AttendanceCmd, Cli, Command, EmployeesCmd, KpiCmd, PayrollCmd, SessionCmd, session_ttl}, terminal::{TerminalNavigator, TerminalNotifier}
};

pub async fn run(cli: Cli) -> anyhow::Result<bool> {
    let store = cli.session_store();
    match &cli.cmd {
        Command::Serve(web) => {
            run_web_server(web.to_config()?).await?;
            Ok(true)
        }
        Command::Session { cmd } => session(cmd, &store, &cli),
        Command::Logout => {
            store.logout(&TerminalNavigator).context("failed to clear the stored session")?;
            Ok(true)
        }
        Command::Dashboard => dashboard(page_context(&cli, &store)?, &store).await,
        Command::Employees { cmd } => employees(cmd, page_context(&cli, &store)?).await,
        Command::Attendance { cmd } => attendance(cmd, page_context(&cli, &store)?).await,
        Command::Approvals { cmd } => approvals(cmd, page_context(&cli, &store)?).await,
        Command::Payroll { cmd } => payroll(cmd, page_context(&cli, &store)?).await,
        Command::Kpi { cmd } => kpi(cmd, page_context(&cli, &store)?).await,
    }
}

/// Backend client authorised from the stored session, toasting to the terminal.
fn page_context(cli: &Cli, store: &SessionStore) -> anyhow::Result<PageContext> {
    if !store.is_authenticated() {
        warn!("no stored session; requests are sent without a token");
    }
    let api = ApiClient::new(&cli.client_settings()?, store.clone()).context("failed to build HTTP client")?;
    debug!(api_url = %cli.api_url, "backend client ready");
    Ok(PageContext::new(Arc::new(api), Arc::new(TerminalNotifier)))
}

fn session(cmd: &SessionCmd, store: &SessionStore, cli: &Cli) -> anyhow::Result<bool> {
    match cmd {
        SessionCmd::Set { token, profile } => {
            store.establish(token, profile.to_profile().as_ref())?;
            println!("session stored in {}", cli.store_path().display());
        }
        SessionCmd::Show => {
            if !store.is_authenticated() {
                println!("not signed in");
                return Ok(true);
            }
            let user = store.current_user();
            println!("{}", greeting(user.as_ref()));
            if let Some(user) = &user {
                println!("  {} <{}> ({})", user.display_name(), user.email, user.display_role());
            }
            if let Some(expires) = store.claims().and_then(|c| DateTime::<Utc>::from_timestamp(c.expires_at, 0)) {
                println!("  expires {}", expires.to_rfc3339());
            }
        }
        SessionCmd::Issue {
            session_secret,
            ttl_hours,
            profile,
            save,
        } => {
            let Some(user) = profile.to_profile() else {
                bail!("give at least one of --user-id, --email, --name or --role");
            };
            let signer = SessionSigner::new(SecretString::from(session_secret.clone()), session_ttl(*ttl_hours)?)?;
            let token = signer.issue(user.clone())?;
            if *save {
                store.establish(&token, Some(&user))?;
            }
            println!("{}", token);
        }
    }
    Ok(true)
}

async fn dashboard(ctx: PageContext, store: &SessionStore) -> anyhow::Result<bool> {
    let page = DashboardPage::new(ctx);
    if !page.load().await.is_applied() {
        return Ok(false);
    }
    let Some(data) = page.data() else {
        return Ok(false);
    };
    let summary = &data.summary;
    println!("{}", greeting(store.current_user().as_ref()));
    println!("Employees     {} ({} active)", summary.total_employees, summary.active_employees);
    println!("Payroll       {}", format_currency(summary.total_payroll));
    println!("Average KPI   {}", format_amount(summary.average_kpi));
    println!("Attendance    {}%", format_amount(summary.attendance_rate));
    println!(
        "Today         {} present, {} absent of {}",
        data.today.present, data.today.absent, data.today.total
    );
    for point in &data.trend {
        println!("  {:<10} {}", point.month, format_currency(point.amount));
    }
    Ok(true)
}

async fn employees(cmd: &EmployeesCmd, ctx: PageContext) -> anyhow::Result<bool> {
    match cmd {
        EmployeesCmd::List { search } => {
            let page = EmployeesPage::new(ctx);
            if !page.load().await.is_applied() {
                return Ok(false);
            }
            page.set_search(search.as_deref().unwrap_or_default());
            for e in page.visible() {
                println!("{:<10} {:<24} {:<30} {:<20} {}", e.id, e.name, e.email, e.position, e.status);
            }
            Ok(true)
        }
        EmployeesCmd::Show { id } => {
            let page = EmployeeDetailPage::new(ctx, id.as_str());
            page.load().await;
            let Some(e) = page.employee() else {
                return Ok(false);
            };
            println!("{} ({})", e.name, e.id);
            println!("  email       {}", e.email);
            println!("  position    {}", e.position);
            println!("  department  {}", e.department);
            println!("  status      {}", e.status);
            if let Some(salary) = e.salary {
                println!("  salary      {}", format_currency(salary));
            }
            if let Some(joined) = &e.join_date {
                println!("  joined      {}", date_input_value(joined));
            }
            Ok(true)
        }
        EmployeesCmd::Create { fields } => {
            let page = EmployeeFormPage::create(ctx);
            page.edit_draft(|draft| fields.apply(draft));
            Ok(navigate(page.submit().await))
        }
        EmployeesCmd::Update { id, fields } => {
            let page = EmployeeFormPage::edit(ctx, id.as_str());
            if !page.load().await.is_applied() {
                return Ok(false);
            }
            page.edit_draft(|draft| fields.apply(draft));
            Ok(navigate(page.submit().await))
        }
        EmployeesCmd::Delete { id } => {
            let page = EmployeesPage::new(ctx);
            page.request_delete(id);
            Ok(page.confirm_delete().await)
        }
    }
}

async fn attendance(cmd: &AttendanceCmd, ctx: PageContext) -> anyhow::Result<bool> {
    let date = match cmd {
        AttendanceCmd::List { date } | AttendanceCmd::Toggle { date, .. } => date.unwrap_or_else(today),
    };
    let page = AttendancePage::for_date(ctx, date);
    if !page.load().await.is_applied() {
        return Ok(false);
    }
    match cmd {
        AttendanceCmd::List { .. } => {
            if let Some(s) = page.summary() {
                println!(
                    "{}: {} present, {} absent, {} late of {} ({}%)",
                    date,
                    s.present,
                    s.absent,
                    s.late,
                    s.total_employees,
                    format_amount(s.rate)
                );
            }
            for r in page.records() {
                println!(
                    "{:<10} {:<24} {:<8} {} - {}",
                    r.id,
                    r.employee_name,
                    r.status.label(),
                    r.check_in.as_deref().unwrap_or("-"),
                    r.check_out.as_deref().unwrap_or("-")
                );
            }
            Ok(true)
        }
        AttendanceCmd::Toggle { id, .. } => {
            let Some(record) = page.records().into_iter().find(|r| &r.id == id) else {
                eprintln!("no attendance record {} on {}", id, date);
                return Ok(false);
            };
            Ok(page.toggle(&record).await)
        }
    }
}

async fn approvals(cmd: &ApprovalsCmd, ctx: PageContext) -> anyhow::Result<bool> {
    let page = ApprovalsPage::new(ctx);
    if !page.load().await.is_applied() {
        return Ok(false);
    }
    let (id, decision, notes) = match cmd {
        ApprovalsCmd::List { tab } => {
            page.set_tab(*tab);
            for a in page.visible() {
                println!(
                    "{:<10} {:<24} {:<10} {} to {}  {:<9} {}",
                    a.id, a.employee_name, a.kind, a.start_date, a.end_date, a.status, a.reason
                );
            }
            return Ok(true);
        }
        ApprovalsCmd::Approve { id, notes } => (id, ApprovalDecision::Approve, notes),
        ApprovalsCmd::Reject { id, notes } => (id, ApprovalDecision::Reject, notes),
    };
    page.set_tab(ApprovalTab::All);
    let Some(approval) = page.visible().into_iter().find(|a| &a.id == id) else {
        eprintln!("no approval request {}", id);
        return Ok(false);
    };
    page.open_review(approval, decision);
    page.set_notes(notes);
    Ok(page.submit_review().await)
}

async fn payroll(cmd: &PayrollCmd, ctx: PageContext) -> anyhow::Result<bool> {
    match cmd {
        PayrollCmd::List { status } => {
            let page = PayrollPage::new(ctx);
            if !page.load().await.is_applied() {
                return Ok(false);
            }
            page.set_filter(*status);
            for r in page.visible() {
                println!(
                    "{:<10} {:<24} {:<8} {:>12} {}",
                    r.id,
                    r.employee_name,
                    r.period,
                    format_currency(r.net_salary),
                    r.status
                );
            }
            Ok(true)
        }
        PayrollCmd::Show { id } => {
            let page = PayrollDetailPage::new(ctx, id.as_str());
            page.load().await;
            let Some(r) = page.record() else {
                return Ok(false);
            };
            println!("{} {} ({})", r.employee_name, r.period, r.status);
            if let Some(email) = &r.employee_email {
                println!("  email       {}", email);
            }
            println!("  basic       {}", format_currency(r.basic_salary));
            println!("  bonuses     {}", format_currency(r.bonuses));
            println!("  deductions  {}", format_currency(r.deductions));
            println!("  net         {}", format_currency(r.net_salary));
            if let Some(paid) = &r.payment_date {
                println!("  paid        {}", date_input_value(paid));
            }
            Ok(true)
        }
        PayrollCmd::Create {
            employee_id,
            period,
            basic,
            bonuses,
            deductions,
        } => {
            let page = PayrollCreatePage::new(ctx);
            page.edit_draft(|draft| {
                draft.employee_id = employee_id.clone();
                draft.period = period.clone();
                draft.basic_salary = basic.clone();
                draft.bonuses = bonuses.clone();
                draft.deductions = deductions.clone();
            });
            println!("net salary {}", page.net_salary_preview());
            Ok(navigate(page.submit().await))
        }
        PayrollCmd::Bulk { period, employees, all } => {
            let page = BulkGeneratePage::new(ctx);
            if !page.load().await.is_applied() {
                return Ok(false);
            }
            if *all {
                page.toggle_all();
            }
            for id in employees {
                page.toggle(id);
            }
            page.set_period(period);
            Ok(navigate(page.submit().await))
        }
        PayrollCmd::MarkPaid { id } => Ok(PayrollPage::new(ctx).mark_paid(id).await),
        PayrollCmd::Export { out } => save(PayrollPage::new(ctx).export().await, out).await,
        PayrollCmd::Slip { id, out } => save(PayrollDetailPage::new(ctx, id.as_str()).download_slip().await, out).await,
    }
}

async fn kpi(cmd: &KpiCmd, ctx: PageContext) -> anyhow::Result<bool> {
    let page = KpiPage::new(ctx);
    if !page.load().await.is_applied() {
        return Ok(false);
    }
    match cmd {
        KpiCmd::List => {
            for k in page.kpis() {
                println!(
                    "{:<10} {:<24} {:<8} {:>6} / {:<6} {:>4}%  {}",
                    k.id,
                    k.employee_name,
                    k.period,
                    format_amount(k.score),
                    format_amount(k.target),
                    k.progress(),
                    k.performance()
                );
            }
            Ok(true)
        }
        KpiCmd::Set { id, score } => {
            let Some(record) = page.kpis().into_iter().find(|k| &k.id == id) else {
                eprintln!("no KPI record {}", id);
                return Ok(false);
            };
            page.open_edit(record);
            page.set_score(score);
            Ok(page.submit_score().await)
        }
    }
}

fn navigate(route: Option<String>) -> bool {
    match route {
        Some(route) => {
            eprintln!("→ {}", route);
            true
        }
        None => false,
    }
}

async fn save(download: Option<Download>, dir: &Path) -> anyhow::Result<bool> {
    let Some(download) = download else {
        return Ok(false);
    };
    let path = dir.join(&download.file_name);
    tokio::fs::write(&path, &download.bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{}", path.display());
    Ok(true)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
