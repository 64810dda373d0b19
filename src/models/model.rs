/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 时间序列模型的公共接口：前向、预测、单步训练、优化器配置
 */

use super::ModelError;
use crate::nn::optimizer::{MultiStepLr, Optimizer, Sgd};
use crate::nn::{Graph, Module, Var, VarLossOps, clip_grad_norm};
use crate::tensor::Tensor;

/// 单个训练步的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingStepOutput {
    /// 本批次的标量损失
    pub loss: f32,
    /// 裁剪前的全局梯度 L2 范数
    pub grad_norm: f32,
}

/// 优化器及可选的学习率调度器，由外部训练器持有
pub struct OptimizerSetup {
    pub optimizer: Box<dyn Optimizer>,
    pub scheduler: Option<MultiStepLr>,
}

/// 时间序列模型
///
/// 外部训练器对每个批次调用`training_step`，之后调用优化器的`step`；
/// 训练开始前调用一次`configure_optimizers`。
///
/// # 使用示例
/// ```ignore
/// let mut setup = model.configure_optimizers();
/// for (batch_idx, (x, y)) in batches.iter().enumerate() {
///     let out = model.training_step((x, y), batch_idx as u64)?;
///     setup.optimizer.step()?;
/// }
/// ```
pub trait TimeSeriesModel: Module {
    /// 模型参数所在的计算图
    fn graph(&self) -> &Graph;

    /// 前向传播（输入的形状由具体模型约定）
    fn forward(&self, x: &Var) -> Result<Var, ModelError>;

    /// 在 eval 模式下前向计算，返回与计算图脱钩的结果
    fn predict(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        let graph = self.graph();
        graph.release_transient_nodes();
        graph.no_grad_scope(|g| -> Result<Tensor, ModelError> {
            let input = g.input(x)?;
            let output = self.forward(&input)?;
            Ok(output.compute()?)
        })
    }

    /// 默认的单步训练：前向 + MSE 损失 + 反向传播，返回损失与梯度范数（不裁剪）
    fn training_step(
        &self,
        batch: (&Tensor, &Tensor),
        _batch_idx: u64,
    ) -> Result<TrainingStepOutput, ModelError> {
        let (x, y) = batch;
        let graph = self.graph();
        graph.release_transient_nodes();
        graph.zero_grad();

        let input = graph.input(x)?;
        let target = graph.input(y)?;
        let pred = self.forward(&input)?;
        let loss = pred.mse_loss(&target)?.backward()?;
        let grad_norm = clip_grad_norm(&self.parameters(), f32::INFINITY)?;
        Ok(TrainingStepOutput { loss, grad_norm })
    }

    /// 默认优化器：学习率 1e-2 的 SGD，不带调度器
    fn configure_optimizers(&self) -> OptimizerSetup {
        OptimizerSetup {
            optimizer: Box::new(Sgd::new(self.graph(), &self.parameters(), 1e-2)),
            scheduler: None,
        }
    }
}
