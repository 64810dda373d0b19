/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 图扩散卷积的支撑矩阵（support）：由邻接矩阵计算缩放拉普拉斯矩阵或随机游走转移矩阵
 */

use crate::nn::GraphError;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 幂迭代的最少迭代次数；上限随节点数增长
const MIN_POWER_ITERATIONS: usize = 100;
const POWER_ITERATIONS_PER_NODE: usize = 50;
/// Rayleigh 商的相对变化小于该值即视为收敛
const POWER_TOLERANCE: f64 = 1e-9;

/// 图滤波器类型，决定扩散卷积使用哪些支撑矩阵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// 缩放拉普拉斯矩阵 `2L/λmax - I`（1个支撑矩阵）
    #[default]
    Laplacian,
    /// 随机游走矩阵 `(D⁻¹A)ᵀ`（1个支撑矩阵）
    RandomWalk,
    /// 正向与反向随机游走矩阵 `(D⁻¹A)ᵀ`、`(D⁻¹Aᵀ)ᵀ`（2个支撑矩阵）
    DualRandomWalk,
}

impl FilterType {
    /// 该滤波器产生的支撑矩阵个数
    pub const fn num_supports(&self) -> usize {
        match self {
            Self::Laplacian | Self::RandomWalk => 1,
            Self::DualRandomWalk => 2,
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Laplacian => "laplacian",
            Self::RandomWalk => "random_walk",
            Self::DualRandomWalk => "dual_random_walk",
        };
        write!(f, "{name}")
    }
}

/// 由`[N, N]`邻接矩阵计算扩散卷积所需的支撑矩阵（均为`[N, N]`）
pub fn build_supports(adj: &Tensor, filter_type: FilterType) -> Result<Vec<Tensor>, GraphError> {
    let shape = adj.shape();
    if shape.len() != 2 || shape[0] != shape[1] || shape[0] == 0 {
        return Err(GraphError::ShapeMismatch {
            expected: vec![shape.first().copied().unwrap_or(0); 2],
            got: shape.to_vec(),
            message: "邻接矩阵必须是非空方阵".to_string(),
        });
    }
    if !adj.is_finite() {
        return Err(GraphError::InvalidOperation(
            "邻接矩阵中含有 NaN 或 inf".to_string(),
        ));
    }

    let supports = match filter_type {
        FilterType::Laplacian => vec![scaled_laplacian(adj)],
        FilterType::RandomWalk => vec![random_walk_matrix(adj).transpose()],
        FilterType::DualRandomWalk => vec![
            random_walk_matrix(adj).transpose(),
            random_walk_matrix(&adj.transpose()).transpose(),
        ],
    };
    Ok(supports)
}

/// 随机游走转移矩阵 `D⁻¹A`（出度为0的行全为0）
fn random_walk_matrix(adj: &Tensor) -> Tensor {
    let n = adj.shape()[0];
    let mut data = adj.to_vec();
    for row in data.chunks_mut(n) {
        let degree: f32 = row.iter().sum();
        let inv = if degree == 0.0 { 0.0 } else { 1.0 / degree };
        for x in row {
            *x *= inv;
        }
    }
    Tensor::new(&data, &[n, n])
}

/// 缩放拉普拉斯矩阵 `2L/λmax - I`，其中 `L = I - D^(-1/2) A D^(-1/2)`，邻接矩阵先对称化
fn scaled_laplacian(adj: &Tensor) -> Tensor {
    let n = adj.shape()[0];
    let raw = adj.to_vec();
    let mut sym = vec![0.0f32; n * n];
    for i in 0..n {
        for j in 0..n {
            sym[i * n + j] = raw[i * n + j].max(raw[j * n + i]);
        }
    }

    let degree_sqrt_inv = sym
        .chunks(n)
        .map(|row| {
            let degree: f32 = row.iter().sum();
            if degree > 0.0 { 1.0 / degree.sqrt() } else { 0.0 }
        })
        .collect::<Vec<_>>();

    let mut laplacian = vec![0.0f32; n * n];
    for i in 0..n {
        for j in 0..n {
            let identity = if i == j { 1.0 } else { 0.0 };
            laplacian[i * n + j] =
                identity - degree_sqrt_inv[i] * sym[i * n + j] * degree_sqrt_inv[j];
        }
    }

    let lambda_max = largest_eigenvalue(&laplacian, n);
    // 孤立图（无边）时 L = I，λmax = 1；数值异常时退回到归一化拉普拉斯谱的上界 2
    let lambda_max = if lambda_max > 1e-6 { lambda_max } else { 2.0 };

    let scaled = laplacian
        .iter()
        .enumerate()
        .map(|(k, &l)| {
            let identity = if k / n == k % n { 1.0 } else { 0.0 };
            2.0 * l / lambda_max - identity
        })
        .collect::<Vec<_>>();
    Tensor::new(&scaled, &[n, n])
}

/// 幂迭代求对称半正定矩阵的最大特征值（Rayleigh 商）
///
/// 最大与次大特征值接近时收敛很慢，故迭代上限随`n`增长，并在 Rayleigh 商稳定后提前结束
fn largest_eigenvalue(matrix: &[f32], n: usize) -> f32 {
    let mat_vec = |v: &[f64]| -> Vec<f64> {
        (0..n)
            .map(|i| (0..n).map(|j| f64::from(matrix[i * n + j]) * v[j]).sum())
            .collect()
    };
    let rayleigh = |v: &[f64], av: &[f64]| -> f64 {
        let numerator: f64 = v.iter().zip(av).map(|(a, b)| a * b).sum();
        let denominator: f64 = v.iter().map(|x| x * x).sum();
        numerator / denominator
    };

    let mut v: Vec<f64> = (0..n)
        .map(|i| ((i * 7 + 13) % 100) as f64 / 100.0 + 0.01)
        .collect();
    let mut av = mat_vec(&v);
    let mut lambda = rayleigh(&v, &av);
    let max_iterations = MIN_POWER_ITERATIONS.max(n * POWER_ITERATIONS_PER_NODE);
    for _ in 0..max_iterations {
        let norm: f64 = av.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm <= 1e-12 {
            return 0.0;
        }
        v = av.iter().map(|x| x / norm).collect();
        av = mat_vec(&v);
        let next = rayleigh(&v, &av);
        let converged = (next - lambda).abs() <= POWER_TOLERANCE * next.abs().max(1.0);
        lambda = next;
        if converged {
            break;
        }
    }
    lambda as f32
}
