use std::sync::Arc;
use std::time::Duration;

use driver_onboarding::validation::reference::read_reference_csv;
use driver_onboarding::validation::{
    luhn_checksum_valid, ApplicantIdentity, ApplicantPayload, BusinessIdentity, ReferenceData,
    ReferenceStore, RegistrationStep, RegistryError, RegistryLookup, RegistryRecord,
    RejectionReason, ValidatedField, ValidationCoordinator, ValidationVerdict,
};

const ACTIVE_SIRET: &str = "73282932000074";

const DOMAINS_CSV: &str = "\
value,note
yopmail.com,relay
mailinator.com,
courrier-jetable.fr,reported by support
";

const SIRETS_CSV: &str = "\
value,note
12345678901234,test fixture
44306184100047,fraud case
";

struct ActiveOnly;

impl RegistryLookup for ActiveOnly {
    fn lookup(&self, siret: &str, _timeout: Duration) -> Result<RegistryRecord, RegistryError> {
        if siret == ACTIVE_SIRET {
            Ok(RegistryRecord {
                siret: siret.to_string(),
                is_active: true,
                company_name: Some("JEAN DUPONT".to_string()),
            })
        } else {
            Err(RegistryError::NotFound)
        }
    }
}

fn reference_from_csv() -> ReferenceData {
    let domains = read_reference_csv(DOMAINS_CSV.as_bytes()).expect("domains parse");
    let sirets = read_reference_csv(SIRETS_CSV.as_bytes()).expect("sirets parse");
    ReferenceData::new(domains, sirets).expect("reference data builds")
}

fn coordinator() -> ValidationCoordinator<ActiveOnly> {
    ValidationCoordinator::new(
        Arc::new(ReferenceStore::new(reference_from_csv())),
        Arc::new(ActiveOnly),
        Duration::from_millis(500),
    )
}

fn applicant() -> ApplicantIdentity {
    ApplicantIdentity {
        firstname: "Marie-Hélène".to_string(),
        lastname: "N'Diaye".to_string(),
        email: "  Marie.NDiaye@Orange.fr ".to_string(),
        phone: "07 87 65 43 21".to_string(),
        address: "8 Avenue Jean Jaurès, 69007 Lyon".to_string(),
        date_of_birth: Some("1990-04-12".to_string()),
    }
}

fn payload(siret: &str) -> ApplicantPayload {
    ApplicantPayload {
        profile: Some(applicant()),
        business_info: Some(BusinessIdentity::new(
            siret,
            "Marie N'Diaye Livraisons",
            "8 Avenue Jean Jaurès, 69007 Lyon",
        )),
    }
}

#[test]
fn applicant_passes_every_registration_step() {
    let coordinator = coordinator();
    let payload = payload("732 829 320 00074");

    for step in RegistrationStep::ordered() {
        let verdict = coordinator.validate_applicant(&payload, step);
        assert_eq!(verdict, ValidationVerdict::Accepted, "step {}", step.label());
    }
}

#[test]
fn csv_reference_lists_drive_rejections() {
    let coordinator = coordinator();

    let mut disposable = payload(ACTIVE_SIRET);
    if let Some(profile) = disposable.profile.as_mut() {
        profile.email = "driver@relay.courrier-jetable.fr".to_string();
    }
    let verdict = coordinator.validate_applicant(&disposable, RegistrationStep::Profile);
    assert_eq!(verdict.reason(), Some(RejectionReason::EmailDisposable));

    let verdict =
        coordinator.validate_applicant(&payload("44306184100047"), RegistrationStep::Business);
    let rejection = verdict.rejection().expect("listed siret rejected");
    assert_eq!(rejection.field, ValidatedField::Siret);
    assert_eq!(rejection.reason, RejectionReason::SiretBlacklisted);
    assert!(luhn_checksum_valid("44306184100047"));
}

#[test]
fn suspicious_domains_are_caught_without_listing() {
    let coordinator = coordinator();
    let mut suspicious = payload(ACTIVE_SIRET);
    if let Some(profile) = suspicious.profile.as_mut() {
        profile.email = "test@fake-domain-xyz.com".to_string();
    }

    let verdict = coordinator.validate_applicant(&suspicious, RegistrationStep::Profile);

    assert_eq!(verdict.reason(), Some(RejectionReason::EmailDisposable));
}

#[test]
fn business_verification_sets_flag_from_registry() {
    let coordinator = coordinator();

    let (business, verdict) = coordinator.verify_business(BusinessIdentity::new(
        "732 829 320 00074",
        "Marie N'Diaye Livraisons",
        "8 Avenue Jean Jaurès, 69007 Lyon",
    ));
    assert!(verdict.is_accepted());
    assert!(business.siret_verified);
    assert_eq!(business.siret, ACTIVE_SIRET);

    let report = coordinator.lookup_activity("55210055400013");
    assert!(report.is_valid);
    assert!(!report.is_active);
}

#[test]
fn verdict_serializes_for_callers() {
    let coordinator = coordinator();
    let mut invalid = payload(ACTIVE_SIRET);
    if let Some(profile) = invalid.profile.as_mut() {
        profile.phone = "08 12 34 56 78".to_string();
    }

    let verdict = coordinator.validate_applicant(&invalid, RegistrationStep::Profile);
    let json = serde_json::to_value(&verdict).expect("verdict serializes");

    assert_eq!(json["outcome"], "rejected");
    assert_eq!(json["field"], "phone");
    assert_eq!(json["reason"], "PHONE_PREMIUM_RATE");
    assert!(json["message"].as_str().is_some_and(|m| m.contains("08")));
}

#[test]
fn shared_coordinator_serves_concurrent_callers() {
    let coordinator = Arc::new(coordinator());

    let handles: Vec<_> = (0..6)
        .map(|worker| {
            let coordinator = Arc::clone(&coordinator);
            std::thread::spawn(move || {
                let siret = if worker % 2 == 0 { ACTIVE_SIRET } else { "12345678901234" };
                coordinator.validate_applicant(&payload(siret), RegistrationStep::Business)
            })
        })
        .collect();

    for (worker, handle) in handles.into_iter().enumerate() {
        let verdict = handle.join().expect("worker completes");
        if worker % 2 == 0 {
            assert!(verdict.is_accepted());
        } else {
            assert_eq!(verdict.reason(), Some(RejectionReason::SiretBlacklisted));
        }
    }
}
