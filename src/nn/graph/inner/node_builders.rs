/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 节点构建方法（new_*_node）
 *
 * 所有构建方法都在创建时根据父节点的期望形状完成校验，
 * 因此形状错误在建图阶段就会以`GraphError`的形式暴露，而非等到前向计算时。
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{
    Add, Concat, Input, InputKind, MaskedMaeLoss, MatMul, MseLoss, Multiply, Narrow, NodeType,
    Parameter, Permute, Reshape, ScalarAdd, ScalarMultiply, Select, Sigmoid, Subtract, Tanh,
    TraitNode,
};
use crate::nn::var::Init;
use crate::tensor::Tensor;

impl GraphInner {
    /// 添加节点到列表
    ///
    /// 未指定名称时自动命名为`<类型>_<id>`；指定名称时须在图中唯一。
    pub(in crate::nn::graph) fn add_node_to_list<T: Into<NodeType>>(
        &mut self,
        raw_node: T,
        name: Option<&str>,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        let raw_node: NodeType = raw_node.into();
        if let Some(name) = name {
            self.check_duplicate_node_name(name)?;
        }
        let node_id = self.generate_valid_node_id();
        let node_name = name.map_or_else(
            || format!("{}_{}", raw_node.type_name(), node_id.0),
            str::to_string,
        );

        for &parent_id in parents {
            self.forward_edges
                .entry(parent_id)
                .or_default()
                .push(node_id);
        }
        self.backward_edges
            .entry(node_id)
            .or_default()
            .extend(parents);

        self.nodes
            .insert(node_id, NodeHandle::new(node_id, &node_name, raw_node));
        Ok(node_id)
    }

    fn parent_shapes(&self, parents: &[NodeId]) -> Result<Vec<&[usize]>, GraphError> {
        parents
            .iter()
            .map(|&id| self.get_node(id).map(NodeHandle::value_expected_shape))
            .collect()
    }

    // ========== 叶子节点 ==========

    /// 创建输入节点并设置数据（临时节点，随`release_transient_nodes`释放）
    pub fn new_input_node(&mut self, data: &Tensor, name: Option<&str>) -> Result<NodeId, GraphError> {
        self.new_leaf_input_node(InputKind::Data, data, name)
    }

    /// 创建常量节点并设置数据（常驻图中，不接收梯度）
    pub fn new_constant_node(&mut self, data: &Tensor, name: Option<&str>) -> Result<NodeId, GraphError> {
        self.new_leaf_input_node(InputKind::Constant, data, name)
    }

    fn new_leaf_input_node(
        &mut self,
        kind: InputKind,
        data: &Tensor,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node_id = self.add_node_to_list(Input::new(kind, data.shape())?, name, &[])?;
        self.set_node_value(node_id, Some(data))?;
        Ok(node_id)
    }

    /// 创建参数节点，并按`init`初始化（图有种子时使用图的 RNG，否则使用 thread_rng）
    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        init: &Init,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node_id = self.add_node_to_list(Parameter::new(shape)?, name, &[])?;
        let value = match self.rng_mut() {
            Some(rng) => init.generate_with_rng(shape, rng),
            None => init.generate_with_rng(shape, &mut rand::thread_rng()),
        };
        self.set_node_value(node_id, Some(&value))?;
        Ok(node_id)
    }

    // ========== 运算节点 ==========

    pub fn new_add_node(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let node = Add::new(&self.parent_shapes(&[a, b])?)?;
        self.add_node_to_list(node, None, &[a, b])
    }

    pub fn new_subtract_node(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let node = Subtract::new(&self.parent_shapes(&[a, b])?)?;
        self.add_node_to_list(node, None, &[a, b])
    }

    pub fn new_multiply_node(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let node = Multiply::new(&self.parent_shapes(&[a, b])?)?;
        self.add_node_to_list(node, None, &[a, b])
    }

    pub fn new_scalar_multiply_node(&mut self, a: NodeId, scalar: f32) -> Result<NodeId, GraphError> {
        let node = ScalarMultiply::new(&self.parent_shapes(&[a])?, scalar)?;
        self.add_node_to_list(node, None, &[a])
    }

    pub fn new_scalar_add_node(&mut self, a: NodeId, scalar: f32) -> Result<NodeId, GraphError> {
        let node = ScalarAdd::new(&self.parent_shapes(&[a])?, scalar)?;
        self.add_node_to_list(node, None, &[a])
    }

    pub fn new_mat_mul_node(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let node = MatMul::new(&self.parent_shapes(&[a, b])?)?;
        self.add_node_to_list(node, None, &[a, b])
    }

    pub fn new_sigmoid_node(&mut self, a: NodeId) -> Result<NodeId, GraphError> {
        let node = Sigmoid::new(&self.parent_shapes(&[a])?)?;
        self.add_node_to_list(node, None, &[a])
    }

    pub fn new_tanh_node(&mut self, a: NodeId) -> Result<NodeId, GraphError> {
        let node = Tanh::new(&self.parent_shapes(&[a])?)?;
        self.add_node_to_list(node, None, &[a])
    }

    // ========== 形状变换节点 ==========

    pub fn new_reshape_node(&mut self, a: NodeId, shape: &[usize]) -> Result<NodeId, GraphError> {
        let node = Reshape::new(&self.parent_shapes(&[a])?, shape)?;
        self.add_node_to_list(node, None, &[a])
    }

    pub fn new_permute_node(&mut self, a: NodeId, axes: &[usize]) -> Result<NodeId, GraphError> {
        let node = Permute::new(&self.parent_shapes(&[a])?, axes)?;
        self.add_node_to_list(node, None, &[a])
    }

    pub fn new_concat_node(&mut self, parents: &[NodeId], axis: usize) -> Result<NodeId, GraphError> {
        let node = Concat::new(&self.parent_shapes(parents)?, axis)?;
        self.add_node_to_list(node, None, parents)
    }

    pub fn new_narrow_node(
        &mut self,
        a: NodeId,
        axis: usize,
        start: usize,
        len: usize,
    ) -> Result<NodeId, GraphError> {
        let node = Narrow::new(&self.parent_shapes(&[a])?, axis, start, len)?;
        self.add_node_to_list(node, None, &[a])
    }

    pub fn new_select_node(&mut self, a: NodeId, axis: usize, index: usize) -> Result<NodeId, GraphError> {
        let node = Select::new(&self.parent_shapes(&[a])?, axis, index)?;
        self.add_node_to_list(node, None, &[a])
    }

    // ========== 损失节点 ==========

    pub fn new_mse_loss_node(&mut self, input: NodeId, target: NodeId) -> Result<NodeId, GraphError> {
        let node = MseLoss::new(&self.parent_shapes(&[input, target])?)?;
        self.add_node_to_list(node, None, &[input, target])
    }

    /// 父节点顺序为 (truth, pred)
    pub fn new_masked_mae_loss_node(&mut self, truth: NodeId, pred: NodeId) -> Result<NodeId, GraphError> {
        let node = MaskedMaeLoss::new(&self.parent_shapes(&[truth, pred])?)?;
        self.add_node_to_list(node, None, &[truth, pred])
    }
}
