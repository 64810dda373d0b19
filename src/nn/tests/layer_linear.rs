use crate::nn::layer::Linear;
use crate::nn::{Graph, GraphError, Module};
use crate::tensor::Tensor;

#[test]
fn test_linear_forward() -> Result<(), GraphError> {
    let graph = Graph::new();
    let fc = Linear::new(&graph, 3, 2, true, "fc")?;
    assert_eq!(fc.in_features(), 3);
    assert_eq!(fc.out_features(), 2);
    assert_eq!(fc.num_params(), 2);
    assert_eq!(fc.num_param_elements(), 8);
    assert_eq!(graph.inner().get_node_name(fc.weights().node_id())?, "fc_W");

    fc.weights()
        .set_value(&Tensor::new(&[1.0, 0.0, 0.0, 1.0, 1.0, 1.0], &[3, 2]))?;
    fc.bias()
        .unwrap()
        .set_value(&Tensor::new(&[0.5, -0.5], &[1, 2]))?;

    let x = graph.input(&Tensor::new(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0], &[2, 3]))?;
    let y = fc.forward(&x)?;
    assert_eq!(
        y.compute()?,
        Tensor::new(&[4.5, 4.5, 0.5, -0.5], &[2, 2])
    );
    Ok(())
}

#[test]
fn test_linear_without_bias() -> Result<(), GraphError> {
    let graph = Graph::new();
    let fc = Linear::new(&graph, 4, 3, false, "fc")?;
    assert!(fc.bias().is_none());
    assert_eq!(fc.parameters().len(), 1);

    let x = graph.input(&Tensor::ones(&[5, 4]))?;
    assert_eq!(fc.forward(&x)?.value_expected_shape()?, vec![5, 3]);
    // 输入宽度不符
    let bad = graph.input(&Tensor::ones(&[5, 3]))?;
    assert!(fc.forward(&bad).is_err());
    Ok(())
}

#[test]
fn test_linear_weights_use_kaiming_scale() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(7);
    let fc = Linear::new(&graph, 200, 50, true, "fc")?;
    let w = fc.weights().value()?.unwrap().to_vec();
    let mean = w.iter().sum::<f32>() / w.len() as f32;
    let std = (w.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / w.len() as f32).sqrt();
    // std = sqrt(2 / fan_in) = 0.1
    assert!(mean.abs() < 1e-2, "mean={mean}");
    assert!((std - 0.1).abs() < 1e-2, "std={std}");
    // 偏置初始为0
    assert_eq!(fc.bias().unwrap().value()?.unwrap(), Tensor::zeros(&[1, 50]));
    Ok(())
}
