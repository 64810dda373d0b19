mod config;
mod curriculum;

use crate::data::StandardScaler;
use crate::models::ModelError;
use crate::models::dcrnn::{Dcrnn, DcrnnConfig};
use crate::tensor::Tensor;

/// 0 - 1 - 2 的路径图
pub(super) fn path_adjacency() -> Tensor {
    Tensor::new(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0], &[3, 3])
}

/// num_nodes=3，rnn_units=4，seq_len=2，horizon=2
pub(super) fn small_config() -> DcrnnConfig {
    DcrnnConfig {
        num_nodes: 3,
        horizon: 2,
        ..DcrnnConfig::new(4, 2)
    }
}

pub(super) fn build_model(config: DcrnnConfig, seed: u64) -> Result<Dcrnn, ModelError> {
    Dcrnn::with_seed(
        &path_adjacency(),
        Box::new(StandardScaler::new(1.0, 2.0)),
        config,
        seed,
    )
}

/// 形状为`shape`的确定性测试数据（元素均不为0）
pub(super) fn sample(shape: &[usize], offset: f32) -> Tensor {
    let size = shape.iter().product::<usize>();
    let data = (0..size)
        .map(|i| offset + ((i * 7 + 3) % 11) as f32 / 10.0 + 0.05)
        .collect::<Vec<_>>();
    Tensor::new(&data, shape)
}
