/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : 优化器（PyTorch 风格）、学习率调度与梯度裁剪
 *
 * - Optimizer 持有 Rc<RefCell<GraphInner>> 引用，只更新绑定的参数
 * - zero_grad()/step() 不需要 &mut Graph 参数
 * - minimize(&loss) 一步完成 zero_grad + backward + step
 */

mod adam;
mod clip;
mod scheduler;
mod sgd;

pub use adam::Adam;
pub use clip::clip_grad_norm;
pub use scheduler::{LrScheduler, MultiStepLr};
pub use sgd::Sgd;

use crate::nn::graph::GraphInner;
use crate::nn::{GraphError, NodeId, Var};
use std::cell::RefCell;
use std::rc::Rc;

/// Optimizer trait（PyTorch 风格）
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = Adam::new(&graph, &model.parameters(), 0.01);
///
/// optimizer.zero_grad()?;
/// let loss = pred.masked_mae_loss(&truth)?;
/// loss.backward()?;
/// optimizer.step()?;
///
/// // 或者一步完成
/// let loss_val = optimizer.minimize(&loss)?;
/// ```
pub trait Optimizer {
    /// 清零绑定参数的梯度
    fn zero_grad(&mut self) -> Result<(), GraphError>;

    /// 更新参数（只更新 Optimizer 绑定的参数，没有梯度的参数跳过）
    fn step(&mut self) -> Result<(), GraphError>;

    /// 一步完成：zero_grad + backward + step，返回 loss 的标量值
    fn minimize(&mut self, loss: &Var) -> Result<f32, GraphError> {
        self.zero_grad()?;
        let loss_val = loss.backward()?;
        self.step()?;
        Ok(loss_val)
    }

    fn learning_rate(&self) -> f32;

    fn set_learning_rate(&mut self, lr: f32);

    /// 重置累积状态（如 Adam 的动量）
    fn reset(&mut self);
}

/// 清零一组参数的梯度（各优化器共用）
fn clear_grads(graph: &Rc<RefCell<GraphInner>>, params: &[NodeId]) -> Result<(), GraphError> {
    let mut g = graph.borrow_mut();
    for &node_id in params {
        g.set_node_grad(node_id, None)?;
    }
    Ok(())
}
