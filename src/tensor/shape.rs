/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 张量的形状变换：变形、维度交换、拼接、切片、选取等。
 *                 所有方法都返回新张量；非法参数会以`TensorError`的信息panic
 */

use super::Tensor;
use crate::errors::{Operator, TensorError};
use ndarray::{Array, ArrayD, Axis, IxDyn, Slice};

impl Tensor {
    /// 变形为`shape`，元素按行优先的逻辑顺序重新排布
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let target_size: usize = shape.iter().product();
        assert!(
            target_size == self.size(),
            "{}",
            TensorError::ReshapeError {
                from: self.shape().to_vec(),
                to: shape.to_vec(),
            }
        );
        let data = Array::from_shape_vec(IxDyn(shape), self.to_vec())
            .unwrap_or_else(|_| ArrayD::zeros(IxDyn(shape)));
        Self::from_array(data)
    }

    /// 按`axes`重新排列维度（类似`PyTorch`的`permute`）
    pub fn permute(&self, axes: &[usize]) -> Self {
        assert!(axes.len() >= 2, "{}", TensorError::PermuteNeedAtLeast2Dims);
        let mut seen = vec![false; self.dimension()];
        let valid = axes.len() == self.dimension()
            && axes.iter().all(|&a| {
                if a >= seen.len() || seen[a] {
                    false
                } else {
                    seen[a] = true;
                    true
                }
            });
        assert!(valid, "{}", TensorError::PermuteNeedUniqueAndInRange);

        let permuted = self.data.view().permuted_axes(IxDyn(axes));
        Self::from_array(permuted.as_standard_layout().into_owned())
    }

    /// 2阶张量的转置
    pub fn transpose(&self) -> Self {
        self.permute(&[1, 0])
    }

    /// 沿`axis`拼接多个张量，除`axis`外其余维度须一致
    pub fn concat(tensors: &[&Self], axis: usize) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        match ndarray::concatenate(Axis(axis), &views) {
            Ok(data) => Self::from_array(data),
            Err(_) => panic!(
                "{}",
                TensorError::OperatorError {
                    operator: Operator::Concat,
                    tensor1_shape: tensors[0].shape().to_vec(),
                    tensor2_shape: tensors
                        .iter()
                        .map(|t| t.shape().to_vec())
                        .find(|s| s.as_slice() != tensors[0].shape())
                        .unwrap_or_default(),
                }
            ),
        }
    }

    /// 在首位新增一个维度，将多个同形张量堆叠起来：n个`[a, b]` -> `[n, a, b]`
    pub fn stack(tensors: &[&Self]) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        assert!(
            tensors.iter().all(|t| t.is_same_shape(tensors[0])),
            "{}",
            TensorError::InconsitentShape
        );
        let expanded = tensors
            .iter()
            .map(|t| {
                let mut shape = vec![1];
                shape.extend_from_slice(t.shape());
                t.reshape(&shape)
            })
            .collect::<Vec<_>>();
        Self::concat(&expanded.iter().collect::<Vec<_>>(), 0)
    }

    /// 沿`axis`截取`[start, start + len)`区间（类似`PyTorch`的`narrow`），维数不变
    pub fn narrow(&self, axis: usize, start: usize, len: usize) -> Self {
        self.check_range(axis, start, start + len);
        Self::from_array(
            self.data
                .slice_axis(Axis(axis), Slice::from(start..start + len))
                .to_owned(),
        )
    }

    /// 选取`axis`上第`index`个切片，结果比原张量少一维（类似`PyTorch`的`select`）
    pub fn select(&self, axis: usize, index: usize) -> Self {
        self.check_range(axis, index, index + 1);
        Self::from_array(self.data.index_axis(Axis(axis), index).to_owned())
    }

    /// `narrow`的逆：构造形状为`shape`的全零张量，并把`part`写入`axis`上从`start`开始的区间
    pub fn embed_narrow(shape: &[usize], axis: usize, start: usize, part: &Self) -> Self {
        let mut out = Self::zeros(shape);
        let len = part.shape()[axis];
        out.check_range(axis, start, start + len);
        out.data
            .slice_axis_mut(Axis(axis), Slice::from(start..start + len))
            .assign(&part.data);
        out
    }

    /// `select`的逆：构造形状为`shape`的全零张量，并把`part`写入`axis`上第`index`个切片
    pub fn embed_select(shape: &[usize], axis: usize, index: usize, part: &Self) -> Self {
        let mut out = Self::zeros(shape);
        out.check_range(axis, index, index + 1);
        out.data.index_axis_mut(Axis(axis), index).assign(&part.data);
        out
    }

    fn check_range(&self, axis: usize, start: usize, end: usize) {
        assert!(
            axis < self.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: self.dimension(),
            }
        );
        let len = self.shape()[axis];
        assert!(
            start < end && end <= len,
            "{}",
            TensorError::RangeOutOfBounds {
                axis,
                start,
                end,
                len,
            }
        );
    }
}
