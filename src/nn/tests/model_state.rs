use crate::nn::{Graph, GraphError, Init};
use std::path::PathBuf;

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("torchts_{tag}_{}.bin", std::process::id()))
}

fn build(seed: u64, a_shape: &[usize]) -> Result<Graph, GraphError> {
    let graph = Graph::new_with_seed(seed);
    graph.parameter(a_shape, Init::Normal { mean: 0.0, std: 1.0 }, "a")?;
    graph.parameter(&[1, 3], Init::Xavier, "b")?;
    Ok(graph)
}

fn param_values(graph: &Graph) -> Vec<Vec<f32>> {
    let inner = graph.inner();
    inner
        .get_trainable_nodes()
        .into_iter()
        .map(|id| inner.get_node_value(id).unwrap().unwrap().to_vec())
        .collect()
}

#[test]
fn test_save_and_load_params() -> Result<(), GraphError> {
    let path = temp_path("roundtrip");
    let source = build(1, &[2, 2])?;
    source.save_params(&path)?;

    let target = build(2, &[2, 2])?;
    assert_ne!(param_values(&source), param_values(&target));
    target.load_params(&path)?;
    assert_eq!(param_values(&source), param_values(&target));

    let _ = std::fs::remove_file(&path);
    Ok(())
}

#[test]
fn test_load_params_validates_before_writing() -> Result<(), GraphError> {
    let path = temp_path("validate");
    build(1, &[2, 2])?.save_params(&path)?;

    // 形状不一致
    let wrong_shape = build(3, &[3, 2])?;
    let before = param_values(&wrong_shape);
    assert!(matches!(
        wrong_shape.load_params(&path),
        Err(GraphError::ShapeMismatch { .. })
    ));
    assert_eq!(param_values(&wrong_shape), before);

    // 文件中缺少参数
    let extra = build(4, &[2, 2])?;
    extra.parameter(&[1, 1], Init::Zeros, "c")?;
    assert!(matches!(
        extra.load_params(&path),
        Err(GraphError::Serialization(_))
    ));

    let _ = std::fs::remove_file(&path);
    Ok(())
}

#[test]
fn test_load_params_rejects_foreign_file() -> Result<(), GraphError> {
    let path = temp_path("foreign");
    std::fs::write(&path, b"not a params file").unwrap();
    let graph = build(1, &[2, 2])?;
    assert!(graph.load_params(&path).is_err());
    assert!(graph.load_params(temp_path("missing")).is_err());
    let _ = std::fs::remove_file(&path);
    Ok(())
}
