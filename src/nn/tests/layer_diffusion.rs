use crate::nn::{FilterType, GraphError, build_supports};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

fn at(t: &Tensor, i: usize, j: usize) -> f32 {
    t.to_vec()[i * t.shape()[1] + j]
}

#[test]
fn test_random_walk_support() -> Result<(), GraphError> {
    let adj = Tensor::new(&[0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0], &[3, 3]);
    let supports = build_supports(&adj, FilterType::RandomWalk)?;
    assert_eq!(supports.len(), 1);
    // (D⁻¹A)ᵀ：转置回去后每行（出度非0）和为1
    let transition = supports[0].transpose();
    assert_abs_diff_eq!(at(&transition, 0, 1), 0.5);
    assert_abs_diff_eq!(at(&transition, 0, 2), 0.5);
    assert_abs_diff_eq!(at(&transition, 1, 0), 1.0);
    assert_abs_diff_eq!(transition.narrow(0, 2, 1).sum(), 0.0);
    Ok(())
}

#[test]
fn test_dual_random_walk_supports() -> Result<(), GraphError> {
    let adj = Tensor::new(&[0.0, 2.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0], &[3, 3]);
    let supports = build_supports(&adj, FilterType::DualRandomWalk)?;
    assert_eq!(supports.len(), FilterType::DualRandomWalk.num_supports());
    // 该图的正向转移矩阵 D⁻¹A 恰为循环置换 P，反向为 Pᵀ
    let p = Tensor::new(&[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0], &[3, 3]);
    assert_eq!(supports[0], p.transpose());
    assert_eq!(supports[1], p);
    Ok(())
}

#[test]
fn test_scaled_laplacian_of_path_graph() -> Result<(), GraphError> {
    // 路径图的归一化拉普拉斯特征值为 0, 1, 2，故缩放后为 L - I = -D^(-1/2) A D^(-1/2)
    let adj = Tensor::new(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0], &[3, 3]);
    let supports = build_supports(&adj, FilterType::Laplacian)?;
    let s = &supports[0];
    let off = -1.0 / 2f32.sqrt();
    for i in 0..3 {
        assert_abs_diff_eq!(at(s, i, i), 0.0, epsilon = 1e-3);
    }
    assert_abs_diff_eq!(at(s, 0, 1), off, epsilon = 1e-3);
    assert_abs_diff_eq!(at(s, 1, 2), off, epsilon = 1e-3);
    assert_abs_diff_eq!(at(s, 0, 2), 0.0, epsilon = 1e-3);
    Ok(())
}

#[test]
fn test_scaled_laplacian_of_long_path_stays_in_range() -> Result<(), GraphError> {
    // 60 个节点的路径图：λmax = 2，次大特征值约为 2 - 0.0014，幂迭代须充分收敛
    let n = 60;
    let mut data = vec![0.0; n * n];
    for i in 0..n - 1 {
        data[i * n + i + 1] = 1.0;
        data[(i + 1) * n + i] = 1.0;
    }
    let s = &build_supports(&Tensor::new(&data, &[n, n]), FilterType::Laplacian)?[0];
    for i in 0..n {
        assert_abs_diff_eq!(at(s, i, i), 0.0, epsilon = 1e-3);
    }
    assert_abs_diff_eq!(at(s, 0, 1), -1.0 / 2f32.sqrt(), epsilon = 2e-3);
    assert_abs_diff_eq!(at(s, 29, 30), -0.5, epsilon = 2e-3);
    Ok(())
}

#[test]
fn test_laplacian_symmetrizes_directed_graph()-> Result<(), GraphError> {
    let adj = Tensor::new(&[0.0, 1.0, 0.0, 0.0, 0.0, 3.0, 2.0, 0.0, 0.0], &[3, 3]);
    let s = &build_supports(&adj, FilterType::Laplacian)?[0];
    for i in 0..3 {
        for j in 0..3 {
            assert_abs_diff_eq!(at(s, i, j), at(s, j, i), epsilon = 1e-6);
        }
    }
    Ok(())
}

#[test]
fn test_laplacian_without_edges_is_identity() -> Result<(), GraphError> {
    let supports = build_supports(&Tensor::zeros(&[4, 4]), FilterType::Laplacian)?;
    let eye = Tensor::eye(4).to_vec();
    for (got, expected) in supports[0].to_vec().iter().zip(&eye) {
        assert_abs_diff_eq!(*got, *expected, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_build_supports_rejects_bad_adjacency() {
    assert!(build_supports(&Tensor::ones(&[2, 3]), FilterType::Laplacian).is_err());
    assert!(build_supports(&Tensor::ones(&[2, 2, 2]), FilterType::RandomWalk).is_err());
    let nan = Tensor::new(&[0.0, f32::NAN, 1.0, 0.0], &[2, 2]);
    assert!(build_supports(&nan, FilterType::DualRandomWalk).is_err());
}

#[test]
fn test_filter_type_serde_names() {
    assert_eq!(
        serde_json::to_string(&FilterType::DualRandomWalk).unwrap(),
        "\"dual_random_walk\""
    );
    let parsed: FilterType = serde_json::from_str("\"random_walk\"").unwrap();
    assert_eq!(parsed, FilterType::RandomWalk);
    assert_eq!(FilterType::default(), FilterType::Laplacian);
    assert_eq!(FilterType::Laplacian.to_string(), "laplacian");
    assert!(serde_json::from_str::<FilterType>("\"chebyshev\"").is_err());
}
