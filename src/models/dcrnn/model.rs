/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : DCRNN 编排：编码器-解码器展开、课程学习（scheduled sampling）、
 *                 单步训练（masked MAE + 梯度裁剪）与优化器配置
 */

use super::{Decoder, DcrnnConfig, Encoder};
use crate::data::Scaler;
use crate::models::{ModelError, OptimizerSetup, TimeSeriesModel, TrainingStepOutput};
use crate::nn::optimizer::{Adam, MultiStepLr};
use crate::nn::{Graph, Module, Var, VarShapeOps, clip_grad_norm, masked_mae_loss};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::path::Path;
use tracing::debug;

/// 训练时的梯度范数上限
const MAX_GRAD_NORM: f32 = 5.0;

const BASE_LEARNING_RATE: f32 = 0.01;
const ADAM_EPSILON: f32 = 1e-3;
const LR_MILESTONES: [usize; 4] = [20, 30, 40, 50];
const LR_DECAY_RATIO: f32 = 0.1;

/// 扩散卷积循环神经网络
///
/// # 张量形状
/// - `forward`的输入：[seq_len, batch, num_nodes * input_dim]
/// - `forward`的输出：[horizon, batch, num_nodes * output_dim]
/// - `training_step`的批次：x 为 [batch, seq_len, num_nodes, input_dim]，
///   y 为 [batch, horizon, num_nodes, 特征数 >= output_dim]
///
/// # 使用示例
/// ```ignore
/// let config = DcrnnConfig { num_nodes: 207, horizon: 12, ..DcrnnConfig::new(64, 12) };
/// let model = Dcrnn::new(&adj, Box::new(scaler), config)?;
/// let mut setup = model.configure_optimizers();
/// let out = model.training_step((&x, &y), batches_seen)?;
/// setup.optimizer.step()?;
/// ```
pub struct Dcrnn {
    config: DcrnnConfig,
    graph: Graph,
    encoder_model: Encoder,
    decoder_model: Decoder,
    scaler: Box<dyn Scaler>,
    rng: RefCell<StdRng>,
}

impl Dcrnn {
    /// 创建模型（参数初始化与课程采样使用随机种子）
    pub fn new(adj: &Tensor, scaler: Box<dyn Scaler>, config: DcrnnConfig) -> Result<Self, ModelError> {
        Self::build(Graph::new(), StdRng::from_entropy(), adj, scaler, config)
    }

    /// 创建可复现的模型：参数初始化与课程采样都由`seed`决定
    pub fn with_seed(
        adj: &Tensor,
        scaler: Box<dyn Scaler>,
        config: DcrnnConfig,
        seed: u64,
    ) -> Result<Self, ModelError> {
        Self::build(
            Graph::new_with_seed(seed),
            StdRng::seed_from_u64(seed),
            adj,
            scaler,
            config,
        )
    }

    fn build(
        graph: Graph,
        rng: StdRng,
        adj: &Tensor,
        scaler: Box<dyn Scaler>,
        config: DcrnnConfig,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        let encoder_model = Encoder::new(&graph, adj, &config)?;
        let decoder_model = Decoder::new(&graph, adj, &config)?;
        debug!(
            num_nodes = config.num_nodes,
            rnn_units = config.rnn_units,
            num_rnn_layers = config.num_rnn_layers,
            filter_type = %config.filter_type,
            "DCRNN 已创建"
        );
        Ok(Self {
            config,
            graph,
            encoder_model,
            decoder_model,
            scaler,
            rng: RefCell::new(rng),
        })
    }

    pub const fn config(&self) -> &DcrnnConfig {
        &self.config
    }

    pub const fn encoder_model(&self) -> &Encoder {
        &self.encoder_model
    }

    pub const fn decoder_model(&self) -> &Decoder {
        &self.decoder_model
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    /// 教师强制的概率：`cl / (cl + exp(batches_seen / cl))`，随训练批次数单调递减
    pub fn compute_sampling_threshold(&self, batches_seen: u64) -> f64 {
        let cl = self.config.cl_decay_steps as f64;
        cl / (cl + (batches_seen as f64 / cl).exp())
    }

    /// 依次编码`seq_len`个时间步，只返回最后的隐藏状态 [num_rnn_layers, batch, hidden_state_size]
    pub fn encoder(&self, inputs: &Var) -> Result<Var, ModelError> {
        let shape = inputs.value_expected_shape()?;
        let width = self.config.num_nodes * self.config.input_dim;
        if shape.len() != 3 || shape[0] != self.config.seq_len || shape[2] != width {
            return Err(ModelError::InvalidInput(format!(
                "编码器输入须为[{}, batch, {width}]，实际为{shape:?}",
                self.config.seq_len
            )));
        }

        let mut hidden: Option<Var> = None;
        for t in 0..self.config.seq_len {
            let step = inputs.select(0, t)?;
            let (_, new_hidden) = self.encoder_model.forward(&step, hidden.as_ref())?;
            hidden = Some(new_hidden);
        }
        hidden.ok_or_else(|| ModelError::InvalidInput("seq_len须大于0".to_string()))
    }

    /// 从编码器的最终隐藏状态展开`horizon`步，返回 [horizon, batch, num_nodes * output_dim]
    ///
    /// 使用模型自带的随机数生成器做课程采样。
    pub fn decoder(
        &self,
        encoder_hidden: &Var,
        labels: Option<&Var>,
        batches_seen: Option<u64>,
    ) -> Result<Var, ModelError> {
        let mut rng = self.rng.borrow_mut();
        self.decoder_with_rng(encoder_hidden, labels, batches_seen, &mut *rng)
    }

    /// 同`decoder`，但课程采样使用调用方提供的随机数生成器
    ///
    /// 训练模式且开启课程学习时，每一步都抽取`c ~ U[0, 1)`，
    /// 若`c`小于采样阈值，则下一步的输入取`labels[t]`而非本步输出；
    /// 此时`labels`与`batches_seen`都必须提供。
    pub fn decoder_with_rng<R: Rng + ?Sized>(
        &self,
        encoder_hidden: &Var,
        labels: Option<&Var>,
        batches_seen: Option<u64>,
        rng: &mut R,
    ) -> Result<Var, ModelError> {
        let hidden_shape = encoder_hidden.value_expected_shape()?;
        if hidden_shape.len() != 3 {
            return Err(ModelError::InvalidInput(format!(
                "解码器的初始隐藏状态须为3阶，实际形状为{hidden_shape:?}"
            )));
        }
        let batch = hidden_shape[1];
        let width = self.config.num_nodes * self.config.output_dim;
        let horizon = self.config.horizon;

        let teacher = if self.is_training() && self.config.use_curriculum_learning {
            let labels = labels.ok_or_else(|| {
                ModelError::InvalidInput("课程学习训练时须提供labels".to_string())
            })?;
            let batches_seen = batches_seen.ok_or_else(|| {
                ModelError::InvalidInput("课程学习训练时须提供batches_seen".to_string())
            })?;
            let label_shape = labels.value_expected_shape()?;
            if label_shape != [horizon, batch, width] {
                return Err(ModelError::InvalidInput(format!(
                    "labels须为[{horizon}, {batch}, {width}]，实际为{label_shape:?}"
                )));
            }
            Some((labels, self.compute_sampling_threshold(batches_seen)))
        } else {
            None
        };

        let mut decoder_input = self.graph.zeros(&[batch, width])?;
        let mut hidden = encoder_hidden.clone();
        let mut outputs = Vec::with_capacity(horizon);
        let mut teacher_forced = 0usize;
        for t in 0..horizon {
            let (output, new_hidden) = self.decoder_model.forward(&decoder_input, &hidden)?;
            hidden = new_hidden;
            decoder_input = output.clone();
            outputs.push(output);

            if let Some((labels, threshold)) = teacher {
                let c: f64 = rng.r#gen();
                if c < threshold {
                    decoder_input = labels.select(0, t)?;
                    teacher_forced += 1;
                }
            }
        }
        if let Some((_, threshold)) = teacher {
            debug!(
                threshold,
                teacher_forced, horizon, "课程学习：本批次使用真实值作为解码输入的步数"
            );
        }

        Ok(Var::stack(&outputs.iter().collect::<Vec<_>>())?)
    }

    /// 编码后解码并完成前向计算
    ///
    /// - `inputs`：[seq_len, batch, num_nodes * input_dim]
    /// - `labels`：[horizon, batch, num_nodes * output_dim]（仅课程学习训练时使用）
    ///
    /// 每次调用都会在图中新建一整轮展开的临时节点；在`training_step`/`predict`之外
    /// 循环调用时，调用方须在两次调用之间执行`graph().release_transient_nodes()`。
    pub fn forward(
        &self,
        inputs: &Var,
        labels: Option<&Var>,
        batches_seen: Option<u64>,
    ) -> Result<Var, ModelError> {
        let encoder_hidden = self.encoder(inputs)?;
        let outputs = self.decoder(&encoder_hidden, labels, batches_seen)?;
        outputs.forward()?;
        Ok(outputs)
    }

    fn is_training(&self) -> bool {
        !self.graph.is_eval()
    }

    /// 检查批次形状，并把 x、y 整理为 [time, batch, num_nodes * features]
    fn prepare_batch(&self, x: &Tensor, y: &Tensor) -> Result<(Tensor, Tensor), ModelError> {
        let c = &self.config;
        let (x_shape, y_shape) = (x.shape(), y.shape());
        if x_shape.len() != 4
            || x_shape[1] != c.seq_len
            || x_shape[2] != c.num_nodes
            || x_shape[3] != c.input_dim
        {
            return Err(ModelError::InvalidInput(format!(
                "x须为[batch, {}, {}, {}]，实际为{x_shape:?}",
                c.seq_len, c.num_nodes, c.input_dim
            )));
        }
        let batch = x_shape[0];
        if y_shape.len() != 4
            || y_shape[0] != batch
            || y_shape[1] != c.horizon
            || y_shape[2] != c.num_nodes
            || y_shape[3] < c.output_dim
        {
            return Err(ModelError::InvalidInput(format!(
                "y须为[{batch}, {}, {}, >= {}]，实际为{y_shape:?}",
                c.horizon, c.num_nodes, c.output_dim
            )));
        }

        let x = x
            .permute(&[1, 0, 2, 3])
            .reshape(&[c.seq_len, batch, c.num_nodes * c.input_dim]);
        let y = y
            .permute(&[1, 0, 2, 3])
            .narrow(3, 0, c.output_dim)
            .reshape(&[c.horizon, batch, c.num_nodes * c.output_dim]);
        Ok((x, y))
    }

    pub fn save_params<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        Ok(self.graph.save_params(path)?)
    }

    pub fn load_params<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        Ok(self.graph.load_params(path)?)
    }
}

impl Module for Dcrnn {
    fn parameters(&self) -> Vec<Var> {
        let mut params = self.encoder_model.parameters();
        params.extend(self.decoder_model.parameters());
        params
    }
}

impl TimeSeriesModel for Dcrnn {
    fn graph(&self) -> &Graph {
        &self.graph
    }

    /// 不带标签的前向（无课程采样）
    fn forward(&self, x: &Var) -> Result<Var, ModelError> {
        Self::forward(self, x, None, None)
    }

    /// 单步训练
    ///
    /// 1. 释放上一步遗留的临时节点，清零参数梯度
    /// 2. 整理批次形状，y 只保留前`output_dim`个特征
    /// 3. 前向（课程学习时以`batch_idx`作为已见批次数）
    /// 4. 真实值与预测值都经 scaler 还原后计算 masked MAE
    /// 5. 反向传播，并把全局梯度范数裁剪到 5.0
    fn training_step(
        &self,
        batch: (&Tensor, &Tensor),
        batch_idx: u64,
    ) -> Result<TrainingStepOutput, ModelError> {
        let (x, y) = self.prepare_batch(batch.0, batch.1)?;
        self.graph.release_transient_nodes();
        self.graph.zero_grad();

        let inputs = self.graph.input(&x)?;
        let labels = self.graph.input(&y)?;
        let outputs = Self::forward(self, &inputs, Some(&labels), Some(batch_idx))?;

        let y_true = self.scaler.inverse_transform_var(&labels)?;
        let y_pred = self.scaler.inverse_transform_var(&outputs)?;
        let loss = masked_mae_loss(&y_true, &y_pred)?.backward()?;
        let grad_norm = clip_grad_norm(&self.parameters(), MAX_GRAD_NORM)?;
        debug!(batch_idx, loss, grad_norm, "DCRNN 训练步完成");
        Ok(TrainingStepOutput { loss, grad_norm })
    }

    /// Adam（lr=0.01，eps=1e-3）+ 在第 20/30/40/50 个 epoch 乘以 0.1 的多阶段衰减
    fn configure_optimizers(&self) -> OptimizerSetup {
        let optimizer = Adam::with_config(
            &self.graph,
            &self.parameters(),
            BASE_LEARNING_RATE,
            0.9,
            0.999,
            ADAM_EPSILON,
        );
        OptimizerSetup {
            optimizer: Box::new(optimizer),
            scheduler: Some(MultiStepLr::new(
                BASE_LEARNING_RATE,
                &LR_MILESTONES,
                LR_DECAY_RATIO,
            )),
        }
    }
}
