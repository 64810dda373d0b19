use crate::data::{IdentityScaler, Scaler, StandardScaler};
use crate::nn::{Graph, GraphError};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_standard_scaler_transform_and_inverse() {
    let scaler = StandardScaler::new(2.0, 4.0);
    let data = Tensor::new(&[2.0, 6.0, -2.0], &[3, 1]);

    let scaled = scaler.transform(&data);
    assert_eq!(scaled, Tensor::new(&[0.0, 1.0, -1.0], &[3, 1]));

    let restored = scaler.inverse_transform(&scaled);
    assert_eq!(restored, data);
}

#[test]
fn test_standard_scaler_fit() {
    let data = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let scaler = StandardScaler::fit(&data);
    assert_abs_diff_eq!(scaler.mean(), 2.5, epsilon = 1e-6);
    assert_abs_diff_eq!(scaler.std(), 1.25f32.sqrt(), epsilon = 1e-6);

    let scaled = scaler.transform(&data);
    assert_abs_diff_eq!(scaled.mean(), 0.0, epsilon = 1e-6);
}

#[test]
fn test_standard_scaler_fit_constant_data() {
    let scaler = StandardScaler::fit(&Tensor::full(3.0, &[2, 3]));
    assert_abs_diff_eq!(scaler.std(), 1.0);
    assert_eq!(
        scaler.transform(&Tensor::full(3.0, &[1, 1])),
        Tensor::zeros(&[1, 1])
    );
}

#[test]
#[should_panic(expected = "std须大于0")]
fn test_standard_scaler_rejects_zero_std() {
    let _ = StandardScaler::new(0.0, 0.0);
}

#[test]
fn test_standard_scaler_inverse_transform_var() -> Result<(), GraphError> {
    let graph = Graph::new();
    let scaler = StandardScaler::new(1.0, 3.0);
    let x = graph.input(&Tensor::new(&[0.0, 1.0, -1.0, 2.0], &[2, 2]))?;

    let restored = scaler.inverse_transform_var(&x)?.compute()?;
    assert_eq!(restored, Tensor::new(&[1.0, 4.0, -2.0, 7.0], &[2, 2]));
    Ok(())
}

#[test]
fn test_identity_scaler() -> Result<(), GraphError> {
    let graph = Graph::new();
    let data = Tensor::new(&[5.0, -1.0], &[1, 2]);
    let scaler = IdentityScaler;
    assert_eq!(scaler.transform(&data), data);
    assert_eq!(scaler.inverse_transform(&data), data);

    let x = graph.input(&data)?;
    let y = scaler.inverse_transform_var(&x)?;
    assert_eq!(y.node_id(), x.node_id());
    Ok(())
}
