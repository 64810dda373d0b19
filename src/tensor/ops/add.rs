/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的加法，实现了两个同形张量“逐元素”（或张量与纯数）相加的运算，并返回一个新的张量。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::AddAssign;

impl_tensor_binary_op!(Add, add, +, Operator::Add);

impl AddAssign<&Tensor> for Tensor {
    fn add_assign(&mut self, rhs: &Tensor) {
        assert!(
            self.is_same_shape(rhs),
            "{}",
            TensorError::OperatorError {
                operator: Operator::AddAssign,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: rhs.shape().to_vec(),
            }
        );
        self.data += &rhs.data;
    }
}

impl AddAssign<f32> for Tensor {
    fn add_assign(&mut self, rhs: f32) {
        self.data += rhs;
    }
}
