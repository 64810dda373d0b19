use crate::errors::{ComparisonOperator, TensorError};
use crate::nn::{GraphError, Var};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// 数据缩放器
///
/// `transform`/`inverse_transform`作用于张量；`inverse_transform_var`作用于计算图变量，
/// 使得还原后的值仍可参与反向传播。
pub trait Scaler {
    fn transform(&self, data: &Tensor) -> Tensor;

    fn inverse_transform(&self, data: &Tensor) -> Tensor;

    fn inverse_transform_var(&self, data: &Var) -> Result<Var, GraphError>;
}

/// 标准化缩放器：`transform(x) = (x - mean) / std`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: f32,
    std: f32,
}

impl StandardScaler {
    /// `std`须大于0，否则panic
    pub fn new(mean: f32, std: f32) -> Self {
        assert!(
            std > 0.0,
            "{}",
            TensorError::ValueMustSatisfyComparison {
                value_name: "std".to_string(),
                operator: ComparisonOperator::GreaterThan,
                threshold: 0,
            }
        );
        Self { mean, std }
    }

    /// 用数据的整体均值和（总体）标准差拟合；数据为常数时标准差取1
    pub fn fit(data: &Tensor) -> Self {
        let mean = data.mean();
        let variance = (data - mean).norm_squared() / data.size().max(1) as f32;
        let std = variance.sqrt();
        Self::new(mean, if std > 0.0 { std } else { 1.0 })
    }

    pub const fn mean(&self) -> f32 {
        self.mean
    }

    pub const fn std(&self) -> f32 {
        self.std
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, data: &Tensor) -> Tensor {
        (data - self.mean) / self.std
    }

    fn inverse_transform(&self, data: &Tensor) -> Tensor {
        data * self.std + self.mean
    }

    fn inverse_transform_var(&self, data: &Var) -> Result<Var, GraphError> {
        data.mul_scalar(self.std)?.add_scalar(self.mean)
    }
}

/// 恒等缩放器（数据未经缩放时使用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityScaler;

impl Scaler for IdentityScaler {
    fn transform(&self, data: &Tensor) -> Tensor {
        data.clone()
    }

    fn inverse_transform(&self, data: &Tensor) -> Tensor {
        data.clone()
    }

    fn inverse_transform_var(&self, data: &Var) -> Result<Var, GraphError> {
        Ok(data.clone())
    }
}
