use crate::nn::GraphError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

mod input;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::{Input, InputKind};
pub(in crate::nn) use loss::{MaskedMaeLoss, MseLoss};
pub(in crate::nn) use ops::{
    Add, Concat, MatMul, Multiply, Narrow, Permute, Reshape, ScalarAdd, ScalarMultiply, Select,
    Sigmoid, Subtract, Tanh,
};
pub(in crate::nn) use parameter::Parameter;

#[enum_dispatch]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Add(Add),
    Subtract(Subtract),
    Multiply(Multiply),
    ScalarMultiply(ScalarMultiply),
    ScalarAdd(ScalarAdd),
    MatMul(MatMul),
    Sigmoid(Sigmoid),
    Tanh(Tanh),
    Reshape(Reshape),
    Permute(Permute),
    Concat(Concat),
    Narrow(Narrow),
    Select(Select),
    MseLoss(MseLoss),
    MaskedMaeLoss(MaskedMaeLoss),
}

/// 各类节点的计算接口
///
/// 节点的值、梯度等公共状态保存在`NodeHandle`中，这里只负责计算：
/// - `calc_value_by_parents`：由父节点的值计算本节点的值
/// - `calc_grad_to_parent`：由本节点的上游梯度计算对第`parent_index`个父节点的梯度（VJP）
#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 节点类型名，用于自动命名和打印
    fn type_name(&self) -> &'static str;

    /// 节点创建时即确定的输出形状
    fn value_expected_shape(&self) -> &[usize];

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError>;

    /// `value`为本节点前向计算得到的值（部分节点如`Sigmoid`的梯度可直接由其算出）
    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError>;
}

/// 校验父节点数量
pub(super) fn check_parents_count(
    node_type: &str,
    parent_shapes: &[&[usize]],
    expected: usize,
) -> Result<(), GraphError> {
    if parent_shapes.len() != expected {
        return Err(GraphError::InvalidOperation(format!(
            "{node_type}节点需要{expected}个父节点，实际为{}个",
            parent_shapes.len()
        )));
    }
    Ok(())
}

/// 两个父节点形状须完全一致（逐元素运算及损失节点共用，不做广播）
pub(super) fn ops_shape_of_two(
    node_type: &str,
    parent_shapes: &[&[usize]],
) -> Result<Vec<usize>, GraphError> {
    check_parents_count(node_type, parent_shapes, 2)?;
    if parent_shapes[0] != parent_shapes[1] {
        return Err(GraphError::ShapeMismatch {
            expected: parent_shapes[0].to_vec(),
            got: parent_shapes[1].to_vec(),
            message: format!("{node_type}节点的两个父节点形状必须一致"),
        });
    }
    Ok(parent_shapes[0].to_vec())
}

/// 梯度计算时`parent_index`越界的统一错误
pub(super) fn invalid_parent_index(node_type: &str, parent_index: usize) -> GraphError {
    GraphError::ComputationError(format!(
        "{node_type}节点没有第{parent_index}个父节点。不该触及本错误，否则说明crate代码有问题"
    ))
}
