/*
 * @Author       : 老董
 * @Date         : 2026-01-08
 * @Description  : 神经网络模块：动态计算图、自动微分、层、优化器
 *
 * - `graph`: 计算图句柄与底层实现（前向缓存、VJP 反向传播、临时节点释放、参数持久化）
 * - `nodes`: 各类节点的具体计算
 * - `var` / `var_ops`: 变量句柄及其扩展方法
 * - `layer`: Linear、DCGRU 等层
 * - `optimizer`: SGD、Adam、学习率调度、梯度裁剪
 */

mod graph;
pub mod layer;
mod module;
mod nodes;
pub mod optimizer;
mod var;
mod var_ops;

pub use graph::{Graph, GraphError, GraphInner};
pub use layer::{Dcgru, DcgruOptions, FilterType, Linear, build_supports};
pub use module::Module;
pub use nodes::NodeId;
pub use optimizer::{Adam, LrScheduler, MultiStepLr, Optimizer, Sgd, clip_grad_norm};
pub use var::{Init, Var};
pub use var_ops::{VarActivationOps, VarLossOps, VarMatrixOps, VarShapeOps, masked_mae_loss};

#[cfg(test)]
mod tests;
