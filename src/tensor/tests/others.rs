use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_mat_mul() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = Tensor::new(&[1.0, 0.0, 0.0, 1.0, 1.0, 1.0], &[3, 2]);
    let c = a.mat_mul(&b);
    assert_eq!(c, Tensor::new(&[4.0, 5.0, 10.0, 11.0], &[2, 2]));
}

#[test]
#[should_panic(expected = "矩阵相乘")]
fn test_mat_mul_incompatible() {
    let a = Tensor::ones(&[2, 3]);
    let _ = a.mat_mul(&Tensor::ones(&[2, 3]));
}

#[test]
fn test_reductions() {
    let a = Tensor::new(&[1.0, -2.0, 3.0, -4.0], &[2, 2]);
    assert_abs_diff_eq!(a.sum(), -2.0);
    assert_abs_diff_eq!(a.mean(), -0.5);
    assert_abs_diff_eq!(a.norm_squared(), 30.0);
    assert_eq!(a.abs(), Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]));
}

#[test]
fn test_sign_of_zero_is_zero() {
    let a = Tensor::new(&[-3.0, 0.0, 5.0], &[3]);
    assert_eq!(a.sign(), Tensor::new(&[-1.0, 0.0, 1.0], &[3]));
}

#[test]
fn test_activations() {
    let a = Tensor::new(&[0.0, 1.0], &[1, 2]);
    let s = a.sigmoid();
    assert_abs_diff_eq!(s[[0, 0]], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(s[[0, 1]], 0.731_058_6, epsilon = 1e-6);
    let t = a.tanh();
    assert_abs_diff_eq!(t[[0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(t[[0, 1]], 0.761_594_2, epsilon = 1e-6);
}

#[test]
fn test_not_equal_mask() {
    let a = Tensor::new(&[0.0, 2.0, 4.0, 0.0], &[4]);
    assert_eq!(a.not_equal_mask(0.0), Tensor::new(&[0.0, 1.0, 1.0, 0.0], &[4]));
}

#[test]
fn test_normal_with_rng_is_reproducible() {
    let mut rng1 = StdRng::seed_from_u64(7);
    let mut rng2 = StdRng::seed_from_u64(7);
    let a = Tensor::normal_with_rng(0.0, 1.0, &[3, 5], &mut rng1);
    let b = Tensor::normal_with_rng(0.0, 1.0, &[3, 5], &mut rng2);
    assert_eq!(a, b);
    assert_eq!(a.shape(), &[3, 5]);
    assert!(a.is_finite());
}

#[test]
fn test_eye() {
    let e = Tensor::eye(3);
    assert_eq!(e[[0, 0]], 1.0);
    assert_eq!(e[[0, 1]], 0.0);
    assert_abs_diff_eq!(e.sum(), 3.0);
}
