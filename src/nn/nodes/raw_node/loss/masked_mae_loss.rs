use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, invalid_parent_index, ops_shape_of_two};
use crate::tensor::Tensor;

/// 带掩码的 MAE（平均绝对误差）损失节点
///
/// 真实值为 0 的位置视为缺失观测，不参与损失计算。
///
/// ## 公式
/// - `mask = (truth != 0)`，`count = sum(mask)`
/// - `loss = sum(mask * |pred - truth|) / count`；`count == 0` 时 `loss = 0`
///
/// ## 梯度
/// `∂L/∂pred = mask * sign(pred - truth) / count`，对 truth 的梯度取负
/// （`|x|` 在 0 处取次梯度 0）
///
/// ## 输入
/// - 父节点 0: truth（真实值）
/// - 父节点 1: pred（预测值）
///
/// ## 输出
/// - 标量损失值 [1, 1]
pub(in crate::nn) struct MaskedMaeLoss {
    shape: Vec<usize>,
}

impl MaskedMaeLoss {
    pub(in crate::nn) fn new(parent_shapes: &[&[usize]]) -> Result<Self, GraphError> {
        ops_shape_of_two("MaskedMaeLoss", parent_shapes)?;
        Ok(Self { shape: vec![1, 1] })
    }
}

impl TraitNode for MaskedMaeLoss {
    fn type_name(&self) -> &'static str {
        "masked_mae_loss"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let (truth, pred) = (parents[0], parents[1]);
        let mask = truth.not_equal_mask(0.0);
        let count = mask.sum();
        let loss = if count > 0.0 {
            (&mask * &(pred - truth).abs()).sum() / count
        } else {
            0.0
        };
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
            GraphError::ComputationError("MaskedMaeLoss节点的上游梯度必须是标量".to_string())
        })?;
        let (truth, pred) = (parents[0], parents[1]);
        let mask = truth.not_equal_mask(0.0);
        let count = mask.sum();
        if count == 0.0 {
            return Ok(Tensor::zeros(truth.shape()));
        }
        let grad_to_pred = &mask * &(pred - truth).sign() * (upstream / count);
        match parent_index {
            0 => Ok(-grad_to_pred),
            1 => Ok(grad_to_pred),
            _ => Err(invalid_parent_index("MaskedMaeLoss", parent_index)),
        }
    }
}
