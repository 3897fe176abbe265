use healthpack::bundle::{self, CONFIG_FILE, PACKET_FILE};
use healthpack::catalog;
use healthpack::checks::{CheckContext, Registry};
use healthpack::engine::run_checks;
use healthpack::models::catalog::Group;
use healthpack::models::Status;
use healthpack::output::compose_report_json;
use healthpack::version::VersionPolicy;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PACKET: &str = r#"
server_version: 10.2.1
database_type: postgres
server_os: linux
total_posts: 3100000
elastic_server_plugins: [analysis-icu, analysis-kuromoji]
ldap_sync_jobs:
  - status: success
  - status: success
message_export_jobs: []
migration_jobs:
  - status: success
  - status: error
data_retention_jobs: null
elastic_post_indexing_jobs:
  - status: success
elastic_post_aggregation_jobs: []
"#;

const CONFIG: &str = r#"{
  "ElasticsearchSettings": {"EnableIndexing": true, "EnableSearching": true, "EnableAutocomplete": true},
  "LdapSettings": {"Enable": true},
  "MessageExportSettings": {"EnableExport": false},
  "DataRetentionSettings": {"EnableMessageDeletion": false, "EnableFileDeletion": false}
}"#;

fn write_packet(dir: &Path, packet: &str) {
    fs::write(dir.join(PACKET_FILE), packet).unwrap();
    fs::write(dir.join(CONFIG_FILE), CONFIG).unwrap();
}

fn statuses(report: &healthpack::models::Report) -> Vec<(String, Status)> {
    report
        .groups
        .iter()
        .flat_map(|g| g.results.iter().map(|r| (r.id.clone(), r.status)))
        .collect()
}

#[test]
fn evaluates_packet_directory_end_to_end() {
    let dir = tempdir().unwrap();
    write_packet(dir.path(), PACKET);

    let bundle = bundle::load_dir(dir.path()).unwrap();
    let catalog = catalog::builtin().unwrap();
    let registry = Registry::builtin();
    registry.validate(&catalog).unwrap();
    let versions = VersionPolicy::default();
    let ctx = CheckContext {
        bundle: &bundle,
        versions: &versions,
    };
    let report = run_checks(&registry, &catalog, &ctx, &[]);

    let expected = vec![
        ("h006", Status::Pass),
        ("h007", Status::Pass),
        ("h008", Status::Pass),
        ("h009", Status::Pass),
        ("h011", Status::Pass),
        ("h012", Status::Pass),
        ("h013", Status::Ignore),
        ("h014", Status::Fail),
        ("h015", Status::Ignore),
        ("h016", Status::Pass),
        ("h017", Status::Pass),
    ];
    let expected: Vec<_> = expected
        .into_iter()
        .map(|(id, s)| (id.to_string(), s))
        .collect();
    assert_eq!(statuses(&report), expected);
    assert!(report.summary.has_problems());
    assert_eq!(report.summary.fail, 1);

    let json = compose_report_json(&report).unwrap();
    assert_eq!(json["groups"][0]["results"][0]["message"], "Supported version: 10.2.1");
    assert_eq!(json["groups"][0]["results"][1]["message"], "Postgres");
    assert_eq!(json["summary"]["total"], 11);
}

#[test]
fn unavailable_post_count_is_an_error_result() {
    let dir = tempdir().unwrap();
    let packet = PACKET.replace("total_posts: 3100000", "total_posts: -1");
    write_packet(dir.path(), &packet);

    let bundle = bundle::load_dir(dir.path()).unwrap();
    let catalog = catalog::builtin().unwrap();
    let versions = VersionPolicy::default();
    let ctx = CheckContext {
        bundle: &bundle,
        versions: &versions,
    };
    let report = run_checks(&Registry::builtin(), &catalog, &ctx, &[Group::Environment]);
    assert_eq!(report.groups.len(), 1);
    let h009 = report.groups[0]
        .results
        .iter()
        .find(|r| r.id == "h009")
        .unwrap();
    assert_eq!(h009.status, Status::Error);
    assert_eq!(
        h009.message,
        "Total post count unavailable in the support packet"
    );
}

#[test]
fn catalog_missing_a_registered_check_fails_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("checks.yaml");
    let mut cat = catalog::builtin().unwrap();
    cat.groups
        .get_mut(&Group::Packet)
        .unwrap()
        .remove("h015");
    catalog::store(&cat, &path).unwrap();

    let loaded = catalog::load(&path).unwrap();
    match Registry::builtin().validate(&loaded) {
        Err(catalog::CatalogError::MissingChecks(ids)) => {
            assert_eq!(ids, vec!["packet/h015".to_string()])
        }
        other => panic!("expected missing checks, got {:?}", other),
    }
}
