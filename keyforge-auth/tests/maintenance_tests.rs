use keyforge_auth::{AuthError, MaintenanceGate, MaintenancePolicy, RoleSet, check_login_allowed};
use keyforge_types::Role;
use std::collections::BTreeSet;

fn username_policy(name: &str) -> MaintenancePolicy {
    MaintenancePolicy {
        exempt_usernames: BTreeSet::from([name.to_string()]),
        exempt_roles: RoleSet::EMPTY,
    }
}

#[test]
fn gate_open_admits_everyone() {
    let gate = MaintenanceGate::new(false, MaintenancePolicy::default());
    for role in Role::ALL {
        assert!(gate.check_login("anyone", Some(role)).is_ok());
    }
    assert!(gate.check_login("ghost", None).is_ok());
}

#[test]
fn default_policy_exempts_admin_tier() {
    let gate = MaintenanceGate::new(true, MaintenancePolicy::default());
    assert!(gate.check_login("a", Some(Role::Admin)).is_ok());
    assert!(gate.check_login("s", Some(Role::SuperAdmin)).is_ok());
    for role in [Role::User, Role::Moderator, Role::Reseller] {
        assert!(matches!(gate.check_login("x", Some(role)), Err(AuthError::ServiceUnavailable)));
    }
}

#[test]
fn unknown_username_gets_service_unavailable() {
    let gate = MaintenanceGate::new(true, MaintenancePolicy::default());
    let err = gate.check_login("ghost", None).unwrap_err();
    assert!(matches!(err, AuthError::ServiceUnavailable));
    assert!(!err.is_unauthenticated());
}

#[test]
fn username_exemption() {
    let policy = username_policy("kcv_admin");
    assert!(check_login_allowed(&policy, "kcv_admin", Some(Role::Admin), true).is_ok());
    assert!(check_login_allowed(&policy, "other_admin", Some(Role::Admin), true).is_err());
    assert!(check_login_allowed(&policy, "other_admin", Some(Role::Admin), false).is_ok());
}

#[test]
fn toggle_flips_and_reports() {
    let gate = MaintenanceGate::new(false, MaintenancePolicy::default());
    assert!(gate.toggle());
    assert!(gate.is_active());
    assert!(!gate.toggle());
    assert!(!gate.is_active());
}

#[test]
fn concurrent_toggles_are_not_lost() {
    use std::sync::Arc;
    use std::thread;

    let gate = Arc::new(MaintenanceGate::new(false, MaintenancePolicy::default()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                for _ in 0..125 {
                    gate.toggle();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    // 1000 flips from off lands on off.
    assert!(!gate.is_active());
}

#[test]
fn policy_deserializes_with_defaults() {
    let policy: MaintenancePolicy = serde_json::from_str(r#"{"exempt_usernames":["root"]}"#).unwrap();
    assert!(policy.exempt_usernames.contains("root"));
    assert_eq!(policy.exempt_roles, RoleSet::of(&[Role::Admin, Role::SuperAdmin]));
}
