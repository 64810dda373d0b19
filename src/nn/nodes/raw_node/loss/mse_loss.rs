use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, invalid_parent_index, ops_shape_of_two};
use crate::tensor::Tensor;

/// MSE（均方误差）损失节点
///
/// ## 公式
/// `MSE = mean((input - target)^2)`
///
/// ## 梯度
/// `∂L/∂input = 2 * (input - target) / N`，对 target 的梯度取负
///
/// ## 输入
/// - 父节点 0: input（预测值）
/// - 父节点 1: target（目标值）
///
/// ## 输出
/// - 标量损失值 [1, 1]
pub(in crate::nn) struct MseLoss {
    shape: Vec<usize>,
}

impl MseLoss {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        ops_shape_of_two("MseLoss", parent_shapes)?;
        Ok(Self { shape: vec![1, 1] })
    }
}

impl TraitNode for MseLoss {
    fn type_name(&self) -> &'static str {
        "mse_loss"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let diff = parents[0] - parents[1];
        let loss = diff.norm_squared() / diff.size() as f32;
        Ok(Tensor::new(&[loss], &self.shape))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let upstream = upstream_grad.get_data_number().ok_or_else(|| {
            GraphError::ComputationError("MseLoss节点的上游梯度必须是标量".to_string())
        })?;
        let diff = parents[0] - parents[1];
        let scale = 2.0 * upstream / diff.size() as f32;
        match parent_index {
            0 => Ok(&diff * scale),
            1 => Ok(&diff * -scale),
            _ => Err(invalid_parent_index("MseLoss", parent_index)),
        }
    }
}
