use super::DcrnnConfig;
use super::encoder::{check_hidden_shape, layer_options, propagate_layers};
use crate::nn::layer::{Dcgru, Linear};
use crate::nn::{Graph, GraphError, Module, Var, VarShapeOps};
use crate::tensor::Tensor;

/// DCRNN 解码器：与编码器结构相同的多层 DCGRU，外加逐节点的线性投影
pub struct Decoder {
    config: DcrnnConfig,
    layers: Vec<Dcgru>,
    /// rnn_units -> output_dim
    projection_layer: Linear,
}

impl Decoder {
    pub fn new(graph: &Graph, adj: &Tensor, config: &DcrnnConfig) -> Result<Self, GraphError> {
        let layers = (0..config.num_rnn_layers)
            .map(|l| {
                Dcgru::new(
                    graph,
                    adj,
                    layer_options(config, l, config.output_dim),
                    &format!("decoder_dcgru{l}"),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let projection_layer = Linear::new(
            graph,
            config.rnn_units,
            config.output_dim,
            true,
            "decoder_projection",
        )?;
        Ok(Self {
            config: config.clone(),
            layers,
            projection_layer,
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
    /// - `inputs`：[batch, num_nodes * output_dim]
    /// - `hidden`：[num_rnn_layers, batch, hidden_state_size]
    ///
    /// 返回（投影后的输出 [batch, num_nodes * output_dim]，新隐藏状态）
    pub fn forward(&self, inputs: &Var, hidden: &Var) -> Result<(Var, Var), GraphError> {
        let (nodes, units, output_dim) = (
            self.config.num_nodes,
            self.config.rnn_units,
            self.config.output_dim,
        );
        let shape = inputs.value_expected_shape()?;
        if shape.len() != 2 || shape[1] != nodes * output_dim {
            return Err(GraphError::ShapeMismatch {
                expected: vec![shape.first().copied().unwrap_or(0), nodes * output_dim],
                got: shape,
                message: "解码器的输入须为[batch, num_nodes * output_dim]".to_string(),
            });
        }
        let batch = shape[0];
        check_hidden_shape(
            hidden,
            self.config.num_rnn_layers,
            batch,
            self.hidden_state_size(),
        )?;

        let (top, new_hidden) = propagate_layers(&self.layers, inputs, hidden)?;
        let projected = self
            .projection_layer
            .forward(&top.reshape(&[batch * nodes, units])?)?
            .reshape(&[batch, nodes * output_dim])?;
        Ok((projected, new_hidden))
    }
}

impl Module for Decoder {
    fn parameters(&self) -> Vec<Var> {
        let mut params: Vec<Var> = self.layers.iter().flat_map(Module::parameters).collect();
        params.extend(self.projection_layer.parameters());
        params
    }
}
