use super::DcrnnConfig;
use crate::nn::layer::{Dcgru, DcgruOptions};
use crate::nn::{Graph, GraphError, Module, Var, VarShapeOps};
use crate::tensor::Tensor;

/// 由配置生成第`layer`层 DCGRU 的参数：第 0 层读原始特征，其余层读下层的隐藏状态
pub(super) fn layer_options(config: &DcrnnConfig, layer: usize, first_input_dim: usize) -> DcgruOptions {
    DcgruOptions {
        num_units: config.rnn_units,
        max_diffusion_step: config.max_diffusion_step,
        num_nodes: config.num_nodes,
        input_dim: if layer == 0 { first_input_dim } else { config.rnn_units },
        filter_type: config.filter_type,
        use_gc_for_ru: config.use_gc_for_ru,
    }
}

/// 逐层推进一个时间步：每层的新状态即上一层的输入
///
/// `hidden`为 [layers, batch, hidden_state_size]，返回（顶层输出，按层堆叠的新状态）。
pub(super) fn propagate_layers(
    layers: &[Dcgru],
    inputs: &Var,
    hidden: &Var,
) -> Result<(Var, Var), GraphError> {
    let mut output = inputs.clone();
    let mut new_states = Vec::with_capacity(layers.len());
    for (l, layer) in layers.iter().enumerate() {
        let state = hidden.select(0, l)?;
        output = layer.forward(&output, &state)?;
        new_states.push(output.clone());
    }
    let stacked = Var::stack(&new_states.iter().collect::<Vec<_>>())?;
    Ok((output, stacked))
}

/// 检查隐藏状态形状为 [layers, batch, hidden_state_size]
pub(super) fn check_hidden_shape(
    hidden: &Var,
    layers: usize,
    batch: usize,
    hidden_state_size: usize,
) -> Result<(), GraphError> {
    let shape = hidden.value_expected_shape()?;
    if shape != [layers, batch, hidden_state_size] {
        return Err(GraphError::ShapeMismatch {
            expected: vec![layers, batch, hidden_state_size],
            got: shape,
            message: "隐藏状态须为[num_rnn_layers, batch, num_nodes * rnn_units]".to_string(),
        });
    }
    Ok(())
}

/// DCRNN 编码器：多层 DCGRU，把一个时间步的输入压缩进各层隐藏状态
pub struct Encoder {
    config: DcrnnConfig,
    graph: Graph,
    layers: Vec<Dcgru>,
}

impl Encoder {
    pub fn new(graph: &Graph, adj: &Tensor, config: &DcrnnConfig) -> Result<Self, GraphError> {
        let layers = (0..config.num_rnn_layers)
            .map(|l| {
                Dcgru::new(
                    graph,
                    adj,
                    layer_options(config, l, config.input_dim),
                    &format!("encoder_dcgru{l}"),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            config: config.clone(),
            graph: graph.clone(),
            layers,
        })
    }

    pub const fn config(&self) -> &DcrnnConfig {
        &self.config
    }

    pub const fn hidden_state_size(&self) -> usize {
        self.config.hidden_state_size()
    }

    /// 推进一个时间步
    ///
    /// - `inputs`：[batch, num_nodes * input_dim]
    /// - `hidden`：[num_rnn_layers, batch, hidden_state_size]，为`None`时取全零
    ///
    /// 返回（顶层输出 [batch, hidden_state_size]，新隐藏状态 [num_rnn_layers, batch, hidden_state_size]）
    pub fn forward(&self, inputs: &Var, hidden: Option<&Var>) -> Result<(Var, Var), GraphError> {
        let shape = inputs.value_expected_shape()?;
        let width = self.config.num_nodes * self.config.input_dim;
        if shape.len() != 2 || shape[1] != width {
            return Err(GraphError::ShapeMismatch {
                expected: vec![shape.first().copied().unwrap_or(0), width],
                got: shape,
                message: "编码器的输入须为[batch, num_nodes * input_dim]".to_string(),
            });
        }
        let batch = shape[0];
        let layers = self.config.num_rnn_layers;
        let hidden_state_size = self.hidden_state_size();

        let zeros;
        let hidden = match hidden {
            Some(h) => h,
            None => {
                zeros = self.graph.zeros(&[layers, batch, hidden_state_size])?;
                &zeros
            }
        };
        check_hidden_shape(hidden, layers, batch, hidden_state_size)?;
        propagate_layers(&self.layers, inputs, hidden)
    }
}

impl Module for Encoder {
    fn parameters(&self) -> Vec<Var> {
        self.layers.iter().flat_map(Module::parameters).collect()
    }
}
