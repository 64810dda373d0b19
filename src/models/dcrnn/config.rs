/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : DCRNN 超参数配置（可从 JSON 加载，缺省字段取默认值）
 */

use crate::nn::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("配置解析失败：{0}")]
    Json(#[from] serde_json::Error),
    #[error("配置项{field}不合法：{reason}")]
    Invalid { field: &'static str, reason: String },
}

const fn default_max_diffusion_step() -> usize {
    2
}

const fn default_cl_decay_steps() -> usize {
    1000
}

const fn default_one() -> usize {
    1
}

const fn default_true() -> bool {
    true
}

/// DCRNN 超参数
///
/// 除`rnn_units`与`seq_len`外均可省略：
/// ```json
/// { "rnn_units": 64, "seq_len": 12, "num_nodes": 207, "horizon": 12 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcrnnConfig {
    /// 最大扩散步数 K
    #[serde(default = "default_max_diffusion_step")]
    pub max_diffusion_step: usize,
    /// 课程学习的衰减步数（越大，教师强制持续越久）
    #[serde(default = "default_cl_decay_steps")]
    pub cl_decay_steps: usize,
    #[serde(default)]
    pub filter_type: FilterType,
    #[serde(default = "default_one")]
    pub num_nodes: usize,
    #[serde(default = "default_one")]
    pub num_rnn_layers: usize,
    /// 每个节点的隐藏单元数
    pub rnn_units: usize,
    /// 门控是否使用图卷积
    #[serde(default = "default_true")]
    pub use_gc_for_ru: bool,
    #[serde(default = "default_one")]
    pub input_dim: usize,
    /// 编码器输入序列长度
    pub seq_len: usize,
    #[serde(default = "default_one")]
    pub output_dim: usize,
    /// 解码器输出序列长度
    #[serde(default = "default_one")]
    pub horizon: usize,
    #[serde(default)]
    pub use_curriculum_learning: bool,
}

impl DcrnnConfig {
    /// 以必填项创建，其余取默认值
    pub const fn new(rnn_units: usize, seq_len: usize) -> Self {
        Self {
            max_diffusion_step: default_max_diffusion_step(),
            cl_decay_steps: default_cl_decay_steps(),
            filter_type: FilterType::Laplacian,
            num_nodes: 1,
            num_rnn_layers: 1,
            rnn_units,
            use_gc_for_ru: true,
            input_dim: 1,
            seq_len,
            output_dim: 1,
            horizon: 1,
            use_curriculum_learning: false,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 每层隐藏状态的宽度：`num_nodes * rnn_units`
    pub const fn hidden_state_size(&self) -> usize {
        self.num_nodes * self.rnn_units
    }

    /// 校验各尺寸均大于0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("cl_decay_steps", self.cl_decay_steps),
            ("num_nodes", self.num_nodes),
            ("num_rnn_layers", self.num_rnn_layers),
            ("rnn_units", self.rnn_units),
            ("input_dim", self.input_dim),
            ("seq_len", self.seq_len),
            ("output_dim", self.output_dim),
            ("horizon", self.horizon),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "须大于0".to_string(),
                });
            }
        }
        Ok(())
    }
}
