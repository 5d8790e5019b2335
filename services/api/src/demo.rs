use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime};
use clap::Args;
use migradesk::error::AppError;
use migradesk::workflows::folders::catalog::RequirementCatalog;
use migradesk::workflows::folders::domain::{ReviewDecision, VisaType};
use migradesk::workflows::folders::repository::FolderRepository;
use migradesk::workflows::folders::service::FolderService;
use migradesk::workflows::scheduling::domain::ApplicantId;
use migradesk::workflows::scheduling::service::SchedulingService;

use crate::infra::{default_agents, InMemoryFolderRepository, InMemoryNotifier};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Applicant identifier used throughout the demo
    #[arg(long, default_value = "1712000001")]
    pub(crate) applicant_id: String,
    /// Visa type for the folder portion of the demo
    #[arg(long, default_value = "trabajo")]
    pub(crate) visa_type: String,
    /// Appointment slot (YYYY-MM-DDTHH:MM). Defaults to 09:00 a week from now.
    #[arg(long, value_parser = crate::infra::parse_slot)]
    pub(crate) slot: Option<NaiveDateTime>,
    /// Evaluation instant for the temporal rules. Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_slot)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Skip the folder portion of the demo.
    #[arg(long)]
    pub(crate) skip_folder: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        applicant_id,
        visa_type,
        slot,
        now,
        skip_folder,
    } = args;

    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let slot = slot.unwrap_or_else(|| {
        (now + Duration::days(7))
            .date()
            .and_hms_opt(9, 0, 0)
            .unwrap_or(now + Duration::days(7))
    });

    println!("MigraDesk case workflow demo");
    println!("\nAppointment scheduling");
    let notifier = Arc::new(InMemoryNotifier::default());
    let scheduling = SchedulingService::new(default_agents(), notifier.clone());
    let applicant = ApplicantId(applicant_id.clone());

    let appointment = scheduling.schedule(&applicant, slot, now)?;
    println!(
        "- Booked {} for {} with agent {} at {}",
        appointment.id.0,
        applicant.0,
        appointment.agent_id.0,
        appointment.slot.format("%Y-%m-%d %H:%M")
    );

    let moved = scheduling.reschedule(&applicant, slot + Duration::days(3), now)?;
    println!(
        "- Rescheduled to {} (agent {})",
        moved.slot.format("%Y-%m-%d %H:%M"),
        moved.agent_id.0
    );

    if skip_folder {
        render_notices(&notifier);
        return Ok(());
    }

    println!("\nDocument folder review");
    let catalog = Arc::new(RequirementCatalog::with_defaults());
    let repository = Arc::new(InMemoryFolderRepository::default());
    let folders = FolderService::new(catalog, repository.clone(), notifier.clone());

    let folder = folders.assign_requirements(&applicant_id, VisaType::new(&visa_type))?;
    println!(
        "- Opened folder {} ({}) with status {}",
        folder.id.0,
        folder.visa_type.0,
        folder.status().label()
    );
    let requirements: Vec<String> = folder
        .documents()
        .map(|record| record.requirement.clone())
        .collect();
    for requirement in &requirements {
        println!("    requirement: {requirement}");
    }

    for requirement in &requirements {
        let updated = folders.upload(
            &folder.id,
            requirement,
            &format!("s3://migradesk/docs/{}/{requirement}-v1.pdf", folder.id.0),
        )?;
        println!(
            "- Uploaded {requirement} v1 -> folder {}",
            updated.status().label()
        );
    }

    for requirement in &requirements {
        let updated = folders.review(&folder.id, requirement, ReviewDecision::Approve)?;
        println!(
            "- Approved {requirement} -> folder {}",
            updated.status().label()
        );
    }

    let completed = scheduling.complete(&applicant)?;
    println!(
        "- Advisory appointment {} marked {}",
        completed.id.0,
        completed.status.label()
    );

    let closed = folders.record_visa_outcome(&folder.id, true, None)?;
    println!("- Visa outcome recorded: {}", closed.status().label());

    match repository.fetch(&folder.id) {
        Ok(Some(stored)) => match serde_json::to_string_pretty(&stored.status_view()) {
            Ok(json) => println!("  Public status payload:\n{json}"),
            Err(err) => println!("  Public status payload unavailable: {err}"),
        },
        Ok(None) => println!("  Repository lookup returned no folder"),
        Err(err) => println!("  Repository unavailable: {err}"),
    }

    render_notices(&notifier);
    Ok(())
}

fn render_notices(notifier: &InMemoryNotifier) {
    let events = notifier.events();
    if events.is_empty() {
        println!("\nApplicant notifications: none dispatched");
        return;
    }
    println!("\nApplicant notifications:");
    for notice in events {
        println!("  - template={} -> {}", notice.template, notice.applicant_id);
    }
}
