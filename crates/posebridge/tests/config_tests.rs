use posebridge::config::{DEFAULT_CAPTURE_TIMEOUT_MS, DEFAULT_FRAME_CAPACITY};
use posebridge::{ConfigError, Device, SessionConfig, SourceConfig};
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = SessionConfig::default();
    assert_eq!(config.frame_capacity(), DEFAULT_FRAME_CAPACITY);
    assert_eq!(config.frame_capacity(), 1280 * 720 * 3);
    assert_eq!(
        config.capture_timeout(),
        Duration::from_millis(DEFAULT_CAPTURE_TIMEOUT_MS)
    );
    assert!(config.frame_output());
    assert_eq!(config.min_keypoint_confidence(), 0.0);
    assert_eq!(*config.device(), Device::Cpu);
    assert_eq!(config.source().uri(), "/dev/video0");
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder() {
    let config = SessionConfig::default()
        .with_max_resolution(1920, 1080, 4)
        .with_capture_timeout(Duration::from_millis(250))
        .with_frame_output(false)
        .with_min_keypoint_confidence(0.3)
        .with_device(Device::Cuda { device_id: 1 })
        .with_source(SourceConfig::default().with_size(640, 480).with_fps(30));

    assert_eq!(config.frame_capacity(), 1920 * 1080 * 4);
    assert_eq!(config.capture_timeout(), Duration::from_millis(250));
    assert!(!config.frame_output());
    assert_eq!(config.min_keypoint_confidence(), 0.3);
    assert_eq!(*config.device(), Device::Cuda { device_id: 1 });
    assert_eq!(config.source().size(), Some((640, 480)));
    assert_eq!(config.source().fps(), Some(30));
}

#[test]
fn test_max_resolution_overflow_fails_validation() {
    let config = SessionConfig::default().with_max_resolution(usize::MAX, 2, 3);
    assert_eq!(config.frame_capacity(), 0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_capture_timeout_rounding() {
    let config = SessionConfig::default().with_capture_timeout(Duration::from_micros(200));
    assert_eq!(config.capture_timeout(), Duration::from_millis(1));
    assert!(config.validate().is_ok());

    let config = SessionConfig::default().with_capture_timeout(Duration::ZERO);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = SessionConfig::default().with_capture_timeout(Duration::MAX);
    assert_eq!(config.capture_timeout(), Duration::from_millis(u64::MAX));
}

#[test]
fn test_json_partial_uses_defaults() {
    let config = SessionConfig::from_json_str(r#"{"capture_timeout_ms": 50}"#).unwrap();
    assert_eq!(config.capture_timeout(), Duration::from_millis(50));
    assert_eq!(config.frame_capacity(), DEFAULT_FRAME_CAPACITY);
    assert!(config.frame_output());
}

#[test]
fn test_json_full() {
    let json = r#"{
        "frame_capacity": 921600,
        "capture_timeout_ms": 500,
        "frame_output": true,
        "min_keypoint_confidence": 0.25,
        "device": {"type": "tensor_rt", "device_id": 0, "fp16": true},
        "source": {"width": 640, "height": 480, "buffer_count": 2}
    }"#;
    let config = SessionConfig::from_json_str(json).unwrap();
    assert_eq!(config.frame_capacity(), 921600);
    assert_eq!(
        *config.device(),
        Device::TensorRt {
            device_id: 0,
            fp16: true
        }
    );
    assert_eq!(config.source().size(), Some((640, 480)));
    assert_eq!(config.source().buffer_count(), 2);
    assert_eq!(config.source().uri(), "/dev/video0");
}

#[test]
fn test_json_round_trip() {
    let config = SessionConfig::default()
        .with_frame_capacity(1024)
        .with_min_keypoint_confidence(0.5);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(SessionConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_validation_errors() {
    match SessionConfig::from_json_str(r#"{"frame_capacity": 0}"#) {
        Err(ConfigError::Invalid(msg)) => assert!(msg.contains("frame_capacity")),
        other => panic!("expected Invalid, got {:?}", other),
    }
    match SessionConfig::from_json_str(r#"{"capture_timeout_ms": 0}"#) {
        Err(ConfigError::Invalid(msg)) => assert!(msg.contains("capture_timeout_ms")),
        other => panic!("expected Invalid, got {:?}", other),
    }
    let config = SessionConfig::default().with_min_keypoint_confidence(1.5);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        SessionConfig::from_json_str("{ frame_capacity"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        SessionConfig::from_json_str(r#"{"frame_capacity": "big"}"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_from_json_file() {
    let path = std::env::temp_dir().join(format!("posebridge_config_{}.json", std::process::id()));
    std::fs::write(&path, r#"{"frame_output": false}"#).unwrap();
    let config = SessionConfig::from_json_file(&path).unwrap();
    assert!(!config.frame_output());
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        SessionConfig::from_json_file(&path),
        Err(ConfigError::Io(_))
    ));
}
