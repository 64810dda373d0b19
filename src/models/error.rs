use crate::models::dcrnn::ConfigError;
use crate::nn::GraphError;
use thiserror::Error;

/// 模型层错误：统一包装计算图错误、配置错误以及输入数据不合法
#[derive(Error, Debug)]
pub enum ModelError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("输入数据不合法：{0}")]
    InvalidInput(String),
}
