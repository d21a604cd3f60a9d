//! Connection setup coverage: which descriptors get a connect attempt and
//! what survives partial failure.

use skateway_sim::config::{credential_var, SimulatorConfig};
use skateway_sim::test_utils::MockHub;
use skateway_sim::{connect_all, load_devices};

fn config_with(devices: &[&str]) -> SimulatorConfig {
    let vars: Vec<String> = devices.iter().map(|d| credential_var(d)).collect();
    SimulatorConfig::from_lookup(move |var| {
        vars.iter()
            .any(|v| v == var)
            .then(|| "HostName=hub.test:7683;DeviceId=x;SharedAccessKey=dGVzdA==".to_string())
    })
    .unwrap()
}

#[tokio::test]
async fn connect_attempts_match_credentialed_devices() {
    // Three known stations, two credentials: exactly two attempts.
    let config = config_with(&["dows-lake", "nac"]);
    let descriptors = load_devices(&config);
    assert_eq!(descriptors.len(), 2);

    let hub = MockHub::new();
    let connected = connect_all(&hub, descriptors).await;

    assert_eq!(hub.connect_attempts(), vec!["dows-lake", "nac"]);
    assert_eq!(connected.len(), 2);
}

#[tokio::test]
async fn connection_failure_skips_device_but_not_the_rest() {
    let config = config_with(&["dows-lake", "fifth-avenue", "nac"]);
    let descriptors = load_devices(&config);

    let hub = MockHub::new();
    hub.refuse_connect("fifth-avenue");

    let connected = connect_all(&hub, descriptors).await;

    // All three were attempted, in table order; only the refused one is out.
    assert_eq!(
        hub.connect_attempts(),
        vec!["dows-lake", "fifth-avenue", "nac"]
    );
    let names: Vec<String> = connected
        .iter()
        .map(|d| d.descriptor.name.clone())
        .collect();
    assert_eq!(names, vec!["dows-lake", "nac"]);
}

#[tokio::test]
async fn no_credentials_means_no_attempts() {
    let config = config_with(&[]);
    let descriptors = load_devices(&config);
    assert!(descriptors.is_empty());

    let hub = MockHub::new();
    let connected = connect_all(&hub, descriptors).await;

    assert!(hub.connect_attempts().is_empty());
    assert!(connected.is_empty());
}

#[tokio::test]
async fn every_connect_refused_yields_empty_set() {
    let config = config_with(&["dows-lake", "fifth-avenue", "nac"]);
    let descriptors = load_devices(&config);

    let hub = MockHub::new();
    hub.refuse_connect("dows-lake");
    hub.refuse_connect("fifth-avenue");
    hub.refuse_connect("nac");

    let connected = connect_all(&hub, descriptors).await;

    assert_eq!(hub.connect_attempts().len(), 3);
    assert!(connected.is_empty());
}
