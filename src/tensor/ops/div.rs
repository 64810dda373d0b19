/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的除法，实现了两个同形张量“逐元素”（或张量与纯数）相除的运算，并返回一个新的张量。
 *                 除数为零时遵循IEEE 754语义（得到inf/NaN），不做额外检查
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl_tensor_binary_op!(Div, div, /, Operator::Div);
