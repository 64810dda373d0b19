/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : DCGRU：以扩散图卷积替代全连接变换的 GRU 单元
 *
 * 单元在时间维上共享参数，每次 forward 只推进一个时间步：
 *   r, u = σ(gconv([x, h]))               （重置门、更新门）
 *   c    = tanh(gconv([x, r ⊙ h]))        （候选状态）
 *   h'   = u ⊙ h + (1 - u) ⊙ c
 */

use super::add_row_bias;
use super::diffusion::{FilterType, build_supports};
use crate::nn::{
    Graph, GraphError, Init, Module, Var, VarActivationOps, VarMatrixOps, VarShapeOps,
};
use crate::tensor::Tensor;

/// DCGRU 单元的超参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcgruOptions {
    /// 每个节点的隐藏单元数
    pub num_units: usize,
    /// 最大扩散步数 K（0 表示不做扩散，只使用节点自身特征）
    pub max_diffusion_step: usize,
    pub num_nodes: usize,
    /// 每个节点的输入特征维度
    pub input_dim: usize,
    pub filter_type: FilterType,
    /// 重置门/更新门是否也使用图卷积（否则使用逐节点全连接）
    pub use_gc_for_ru: bool,
}

/// 扩散卷积 GRU 单元
///
/// # 输入/输出形状
/// - 输入 `inputs`：[batch, num_nodes * input_dim]
/// - 状态 `hx`：[batch, num_nodes * num_units]
/// - 输出（新状态）：[batch, num_nodes * num_units]
pub struct Dcgru {
    options: DcgruOptions,
    /// 支撑矩阵常量 [num_nodes, num_nodes]
    supports: Vec<Var>,
    /// 门控权重：gconv 时为 [(input_dim + units) * M, 2 * units]，全连接时为 [input_dim + units, 2 * units]
    gate_weights: Var,
    gate_biases: Var,
    /// 候选状态权重 [(input_dim + units) * M, units]
    candidate_weights: Var,
    candidate_biases: Var,
}

impl Dcgru {
    /// 门控偏置的初始值（偏向“保留旧状态”）
    const GATE_BIAS_START: f32 = 1.0;

    pub fn new(
        graph: &Graph,
        adj: &Tensor,
        options: DcgruOptions,
        name: &str,
    ) -> Result<Self, GraphError> {
        if options.num_units == 0 || options.num_nodes == 0 || options.input_dim == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "DCGRU的隐藏单元数、节点数、输入维度都须大于0：{options:?}"
            )));
        }
        if adj.shape() != [options.num_nodes, options.num_nodes] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![options.num_nodes, options.num_nodes],
                got: adj.shape().to_vec(),
                message: format!("{name}的邻接矩阵须与节点数一致"),
            });
        }

        let supports = build_supports(adj, options.filter_type)?
            .iter()
            .enumerate()
            .map(|(i, s)| graph.constant_named(s, &format!("{name}_support{i}")))
            .collect::<Result<Vec<_>, _>>()?;

        let input_size = options.input_dim + options.num_units;
        let num_matrices = Self::num_matrices(&options);
        let units = options.num_units;

        let gate_rows = if options.use_gc_for_ru {
            input_size * num_matrices
        } else {
            input_size
        };
        let gate_weights = graph.parameter(
            &[gate_rows, 2 * units],
            Init::Xavier,
            &format!("{name}_gate_W"),
        )?;
        let gate_biases = graph.parameter(
            &[1, 2 * units],
            Init::Constant(Self::GATE_BIAS_START),
            &format!("{name}_gate_b"),
        )?;
        let candidate_weights = graph.parameter(
            &[input_size * num_matrices, units],
            Init::Xavier,
            &format!("{name}_candidate_W"),
        )?;
        let candidate_biases =
            graph.parameter(&[1, units], Init::Zeros, &format!("{name}_candidate_b"))?;

        Ok(Self {
            options,
            supports,
            gate_weights,
            gate_biases,
            candidate_weights,
            candidate_biases,
        })
    }

    /// 扩散后得到的特征矩阵个数：`1 + 支撑矩阵数 * K`
    const fn num_matrices(options: &DcgruOptions) -> usize {
        options.filter_type.num_supports() * options.max_diffusion_step + 1
    }

    pub const fn options(&self) -> &DcgruOptions {
        &self.options
    }

    /// 单元输出（状态）的宽度：`num_nodes * num_units`
    pub const fn hidden_state_size(&self) -> usize {
        self.options.num_nodes * self.options.num_units
    }

    /// 推进一个时间步，返回新的隐藏状态
    pub fn forward(&self, inputs: &Var, hx: &Var) -> Result<Var, GraphError> {
        let (nodes, units) = (self.options.num_nodes, self.options.num_units);
        let input_shape = inputs.value_expected_shape()?;
        let batch = input_shape[0];
        if input_shape != [batch, nodes * self.options.input_dim] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![batch, nodes * self.options.input_dim],
                got: input_shape,
                message: "DCGRU的输入须为[batch, num_nodes * input_dim]".to_string(),
            });
        }
        let state_shape = hx.value_expected_shape()?;
        if state_shape != [batch, nodes * units] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![batch, nodes * units],
                got: state_shape,
                message: "DCGRU的隐藏状态须为[batch, num_nodes * num_units]".to_string(),
            });
        }

        // [batch * nodes, 2 * units]
        let gates = if self.options.use_gc_for_ru {
            self.gconv(inputs, hx, &self.gate_weights, &self.gate_biases)?
        } else {
            self.fc(inputs, hx, &self.gate_weights, &self.gate_biases)?
        }
        .sigmoid();
        let r = gates.narrow(1, 0, units)?.reshape(&[batch, nodes * units])?;
        let u = gates.narrow(1, units, units)?.reshape(&[batch, nodes * units])?;

        let reset_state = r.try_mul(hx)?;
        let c = self
            .gconv(
                inputs,
                &reset_state,
                &self.candidate_weights,
                &self.candidate_biases,
            )?
            .tanh()
            .reshape(&[batch, nodes * units])?;

        // h' = u ⊙ h + (1 - u) ⊙ c = c + u ⊙ (h - c)
        let delta = u.try_mul(&hx.try_sub(&c)?)?;
        c.try_add(&delta)
    }

    /// 把输入和状态按节点拼接：[batch, nodes, input_dim + units]
    fn concat_per_node(&self, inputs: &Var, state: &Var) -> Result<Var, GraphError> {
        let batch = inputs.value_expected_shape()?[0];
        let nodes = self.options.num_nodes;
        let x = inputs.reshape(&[batch, nodes, self.options.input_dim])?;
        let h = state.reshape(&[batch, nodes, self.options.num_units])?;
        Var::concat(&[&x, &h], 2)
    }

    /// 逐节点全连接：[batch * nodes, input_size] @ W + b
    fn fc(&self, inputs: &Var, state: &Var, weights: &Var, biases: &Var) -> Result<Var, GraphError> {
        let batch = inputs.value_expected_shape()?[0];
        let input_size = self.options.input_dim + self.options.num_units;
        let x = self
            .concat_per_node(inputs, state)?
            .reshape(&[batch * self.options.num_nodes, input_size])?;
        add_row_bias(&x.matmul(weights)?, biases)
    }

    /// 扩散图卷积，返回 [batch * nodes, out]
    ///
    /// 对每个支撑矩阵 S 做 K 步 Chebyshev 式递推：
    /// `x1 = S x0`，`xk = 2 S x(k-1) - x(k-2)`，
    /// 所有 `1 + |S| * K` 个结果按特征拼接后做仿射变换。
    fn gconv(&self, inputs: &Var, state: &Var, weights: &Var, biases: &Var) -> Result<Var, GraphError> {
        let batch = inputs.value_expected_shape()?[0];
        let nodes = self.options.num_nodes;
        let input_size = self.options.input_dim + self.options.num_units;

        // [batch, nodes, F] -> [nodes, batch, F] -> [nodes, batch * F]
        let x0 = self
            .concat_per_node(inputs, state)?
            .permute(&[1, 0, 2])?
            .reshape(&[nodes, batch * input_size])?;

        let mut diffused = vec![x0.clone()];
        if self.options.max_diffusion_step > 0 {
            for support in &self.supports {
                let mut prev = x0.clone();
                let mut current = support.matmul(&x0)?;
                diffused.push(current.clone());
                for _ in 2..=self.options.max_diffusion_step {
                    let next = support.matmul(&current)?.mul_scalar(2.0)?.try_sub(&prev)?;
                    diffused.push(next.clone());
                    prev = current;
                    current = next;
                }
            }
        }

        // 每个 [nodes, batch * F] 还原为 [batch * nodes, F] 后按特征拼接
        let per_row = diffused
            .iter()
            .map(|m| {
                m.reshape(&[nodes, batch, input_size])?
                    .permute(&[1, 0, 2])?
                    .reshape(&[batch * nodes, input_size])
            })
            .collect::<Result<Vec<_>, _>>()?;
        let x = Var::concat(&per_row.iter().collect::<Vec<_>>(), 1)?;

        add_row_bias(&x.matmul(weights)?, biases)
    }
}

impl Module for Dcgru {
    fn parameters(&self) -> Vec<Var> {
        vec![
            self.gate_weights.clone(),
            self.gate_biases.clone(),
            self.candidate_weights.clone(),
            self.candidate_biases.clone(),
        ]
    }
}
