/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 损失函数扩展 trait
 */

use crate::nn::{GraphError, Var};

/// 损失函数扩展 trait
///
/// - `mse_loss(target)`: 均方误差损失
/// - `masked_mae_loss(truth)`: 以真实值中的 0 为缺失掩码的平均绝对误差
///
/// # 使用示例
/// ```ignore
/// use torchts::nn::VarLossOps;
///
/// let loss = output.mse_loss(&target)?;
/// let loss = pred.masked_mae_loss(&truth)?;
/// ```
pub trait VarLossOps {
    /// MSE Loss，返回标量损失节点 [1, 1]
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError>;

    /// Masked MAE Loss（`self`为预测值），返回标量损失节点 [1, 1]
    fn masked_mae_loss(&self, truth: &Var) -> Result<Var, GraphError>;
}

impl VarLossOps for Var {
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(target, "MSE损失计算")?;
        let id = self
            .graph()
            .borrow_mut()
            .new_mse_loss_node(self.node_id(), target.node_id())?;
        Ok(self.derive(id))
    }

    fn masked_mae_loss(&self, truth: &Var) -> Result<Var, GraphError> {
        masked_mae_loss(truth, self)
    }
}

/// 带掩码的 MAE 损失：`sum(mask * |pred - truth|) / sum(mask)`，其中 `mask = (truth != 0)`
///
/// 真实值全为 0 时损失为 0。
pub fn masked_mae_loss(truth: &Var, pred: &Var) -> Result<Var, GraphError> {
    truth.check_same_graph(pred, "Masked MAE损失计算")?;
    let id = truth
        .graph()
        .borrow_mut()
        .new_masked_mae_loss_node(truth.node_id(), pred.node_id())?;
    Ok(truth.derive(id))
}
