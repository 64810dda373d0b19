use crate::nn::{Graph, GraphError, Init, VarMatrixOps};
use crate::tensor::Tensor;

#[test]
fn test_node_names_and_edges() {
    let graph = Graph::new();
    let x = graph.input(&Tensor::ones(&[1, 2])).unwrap();
    let w = graph.parameter(&[2, 3], Init::Zeros, "w").unwrap();
    let y = x.matmul(&w).unwrap();

    let inner = graph.inner();
    // 未指定名称时自动命名为`<类型>_<id>`
    assert_eq!(inner.get_node_name(x.node_id()).unwrap(), "input_1");
    assert_eq!(inner.get_node_name(w.node_id()).unwrap(), "w");
    assert_eq!(inner.get_node_name(y.node_id()).unwrap(), "mat_mul_3");
    assert_eq!(
        inner.get_node_parents(y.node_id()).unwrap(),
        vec![x.node_id(), w.node_id()]
    );
    assert_eq!(inner.get_node_children(x.node_id()).unwrap(), vec![y.node_id()]);
    assert_eq!(inner.get_trainable_nodes(), vec![w.node_id()]);
    assert_eq!(y.value_expected_shape().unwrap(), vec![1, 3]);
}

#[test]
fn test_duplicate_node_name() {
    let graph = Graph::new();
    graph.parameter(&[1, 1], Init::Zeros, "w").unwrap();
    let err = graph.parameter(&[1, 1], Init::Zeros, "w").unwrap_err();
    assert!(matches!(err, GraphError::DuplicateNodeName(_)));
}

#[test]
fn test_shape_error_surfaces_at_build_time() {
    let graph = Graph::new();
    let x = graph.input(&Tensor::ones(&[1, 2])).unwrap();
    let w = graph.parameter(&[3, 1], Init::Zeros, "w").unwrap();
    assert!(x.matmul(&w).is_err());
    assert!(x.try_add(&w).is_err());
    // 参数须为2阶
    assert!(graph.parameter(&[2, 2, 2], Init::Zeros, "p3").is_err());
}

#[test]
fn test_forward_is_cached_and_invalidated() {
    let graph = Graph::new();
    let x = graph.input(&Tensor::new(&[1.0, 2.0], &[1, 2])).unwrap();
    let w = graph.parameter(&[2, 1], Init::Constant(1.0), "w").unwrap();
    let y = x.matmul(&w).unwrap();

    assert!(y.value().unwrap().is_none());
    y.forward().unwrap();
    assert_eq!(y.value().unwrap().unwrap(), Tensor::new(&[3.0], &[1, 1]));

    // 修改叶子节点后，下游缓存失效
    x.set_value(&Tensor::new(&[3.0, 4.0], &[1, 2])).unwrap();
    assert!(y.value().unwrap().is_none());
    assert_eq!(y.item().unwrap(), 7.0);

    w.set_value(&Tensor::new(&[2.0, 0.0], &[2, 1])).unwrap();
    assert_eq!(y.item().unwrap(), 6.0);
}

#[test]
fn test_set_value_rules() {
    let graph = Graph::new();
    let x = graph.input(&Tensor::ones(&[1, 2])).unwrap();
    let y = x.mul_scalar(2.0).unwrap();
    // 运算节点的值不能手动设置
    assert!(y.set_value(&Tensor::ones(&[1, 2])).is_err());
    // 形状须一致
    assert!(x.set_value(&Tensor::ones(&[2, 1])).is_err());
}

#[test]
fn test_release_transient_nodes() {
    let graph = Graph::new();
    let c = graph.constant(&Tensor::eye(2)).unwrap();
    let w = graph.parameter(&[2, 2], Init::Constant(0.5), "w").unwrap();
    let x = graph.input(&Tensor::ones(&[1, 2])).unwrap();
    let y = x.matmul(&c).unwrap().matmul(&w).unwrap();
    y.forward().unwrap();
    assert_eq!(graph.inner().nodes_count(), 5);

    assert_eq!(graph.release_transient_nodes(), 3);
    assert_eq!(graph.inner().nodes_count(), 2);
    assert_eq!(y.value().unwrap_err(), GraphError::NodeNotFound(y.node_id()));
    assert!(graph.inner().get_node_children(c.node_id()).unwrap().is_empty());
    assert_eq!(graph.release_transient_nodes(), 0);

    // 常量和参数仍可继续使用
    let x2 = graph.input(&Tensor::new(&[2.0, 4.0], &[1, 2])).unwrap();
    let y2 = x2.matmul(&c).unwrap().matmul(&w).unwrap();
    assert_eq!(y2.compute().unwrap(), Tensor::new(&[3.0, 3.0], &[1, 2]));
}

#[test]
fn test_train_eval_mode() {
    let graph = Graph::new();
    assert!(!graph.is_eval());
    let inside = graph.no_grad_scope(|g| g.is_eval());
    assert!(inside);
    assert!(!graph.is_eval());

    graph.eval();
    graph.no_grad_scope(|_| ());
    assert!(graph.is_eval());
    graph.train();
    assert!(!graph.is_eval());
}

#[test]
fn test_seeded_graphs_are_reproducible() {
    let g1 = Graph::new_with_seed(7);
    let g2 = Graph::new_with_seed(7);
    let init = Init::Normal { mean: 0.0, std: 1.0 };
    let a = g1.parameter(&[3, 4], init.clone(), "a").unwrap();
    let b = g2.parameter(&[3, 4], init, "a").unwrap();
    assert_eq!(a.value().unwrap(), b.value().unwrap());
    assert!(!a.same_graph(&b));
}
