use crate::models::dcrnn::{ConfigError, DcrnnConfig};
use crate::nn::FilterType;

#[test]
fn test_config_defaults_from_json() {
    let config = DcrnnConfig::from_json_str(r#"{ "rnn_units": 4, "seq_len": 2 }"#).unwrap();
    assert_eq!(config, DcrnnConfig::new(4, 2));
    assert_eq!(config.max_diffusion_step, 2);
    assert_eq!(config.cl_decay_steps, 1000);
    assert_eq!(config.filter_type, FilterType::Laplacian);
    assert_eq!(config.num_nodes, 1);
    assert_eq!(config.num_rnn_layers, 1);
    assert!(config.use_gc_for_ru);
    assert_eq!(config.input_dim, 1);
    assert_eq!(config.output_dim, 1);
    assert_eq!(config.horizon, 1);
    assert!(!config.use_curriculum_learning);
}

#[test]
fn test_config_full_json() {
    let json = r#"{
        "max_diffusion_step": 3,
        "cl_decay_steps": 2000,
        "filter_type": "dual_random_walk",
        "num_nodes": 207,
        "num_rnn_layers": 2,
        "rnn_units": 64,
        "use_gc_for_ru": false,
        "input_dim": 2,
        "seq_len": 12,
        "output_dim": 1,
        "horizon": 12,
        "use_curriculum_learning": true
    }"#;
    let config = DcrnnConfig::from_json_str(json).unwrap();
    assert_eq!(config.filter_type, FilterType::DualRandomWalk);
    assert_eq!(config.hidden_state_size(), 207 * 64);
    assert!(config.use_curriculum_learning);

    let again = DcrnnConfig::from_json_str(&config.to_json_string().unwrap()).unwrap();
    assert_eq!(again, config);
}

#[test]
fn test_config_rejects_missing_or_invalid_fields() {
    assert!(matches!(
        DcrnnConfig::from_json_str(r#"{ "seq_len": 2 }"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        DcrnnConfig::from_json_str(r#"{ "rnn_units": 4, "seq_len": 2, "filter_type": "cheb" }"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        DcrnnConfig::from_json_str(r#"{ "rnn_units": 4, "seq_len": 2, "num_nodes": 0 }"#),
        Err(ConfigError::Invalid { field: "num_nodes", .. })
    ));

    let mut config = DcrnnConfig::new(4, 2);
    config.horizon = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "horizon", .. })
    ));
}

#[test]
fn test_config_from_json_file() {
    let path = std::env::temp_dir().join(format!("torchts_config_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "rnn_units": 8, "seq_len": 3, "num_nodes": 5 }"#).unwrap();
    let config = DcrnnConfig::from_json_file(&path).unwrap();
    assert_eq!(config.hidden_state_size(), 40);
    let _ = std::fs::remove_file(&path);

    assert!(matches!(
        DcrnnConfig::from_json_file(std::env::temp_dir().join("torchts_no_such_config.json")),
        Err(ConfigError::Io(_))
    ));
}
