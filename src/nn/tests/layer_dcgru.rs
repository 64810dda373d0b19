use crate::nn::layer::{Dcgru, DcgruOptions};
use crate::nn::{FilterType, Graph, GraphError, Module};
use crate::tensor::Tensor;

fn path_adjacency() -> Tensor {
    // 0 - 1 - 2
    Tensor::new(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0], &[3, 3])
}

fn options(filter_type: FilterType, max_diffusion_step: usize, use_gc_for_ru: bool) -> DcgruOptions {
    DcgruOptions {
        num_units: 4,
        max_diffusion_step,
        num_nodes: 3,
        input_dim: 2,
        filter_type,
        use_gc_for_ru,
    }
}

#[test]
fn test_dcgru_parameter_shapes() -> Result<(), GraphError> {
    let graph = Graph::new();
    let cell = Dcgru::new(&graph, &path_adjacency(), options(FilterType::Laplacian, 2, true), "cell")?;
    let shapes = cell
        .parameters()
        .iter()
        .map(|p| p.value_expected_shape())
        .collect::<Result<Vec<_>, _>>()?;
    // (input_dim + units) * (1 + 1 * K) = 6 * 3
    assert_eq!(shapes, vec![vec![18, 8], vec![1, 8], vec![18, 4], vec![1, 4]]);
    assert_eq!(cell.hidden_state_size(), 12);
    assert_eq!(cell.options().num_units, 4);

    let gate_bias = cell.parameters()[1].value()?.unwrap();
    assert_eq!(gate_bias, Tensor::ones(&[1, 8]));
    Ok(())
}

#[test]
fn test_dcgru_weight_rows_follow_filter_and_gate_mode() -> Result<(), GraphError> {
    let graph = Graph::new();
    let adj = path_adjacency();
    let dual = Dcgru::new(&graph, &adj, options(FilterType::DualRandomWalk, 2, true), "dual")?;
    assert_eq!(dual.parameters()[0].value_expected_shape()?, vec![30, 8]);

    let fc_gates = Dcgru::new(&graph, &adj, options(FilterType::RandomWalk, 2, false), "fc")?;
    assert_eq!(fc_gates.parameters()[0].value_expected_shape()?, vec![6, 8]);
    assert_eq!(fc_gates.parameters()[2].value_expected_shape()?, vec![18, 4]);

    let no_diffusion = Dcgru::new(&graph, &adj, options(FilterType::Laplacian, 0, true), "k0")?;
    assert_eq!(no_diffusion.parameters()[0].value_expected_shape()?, vec![6, 8]);
    Ok(())
}

#[test]
fn test_dcgru_forward_shape_and_range() -> Result<(), GraphError> {
    for (filter_type, k, gc) in [
        (FilterType::Laplacian, 2, true),
        (FilterType::RandomWalk, 1, false),
        (FilterType::DualRandomWalk, 3, true),
        (FilterType::Laplacian, 0, true),
    ] {
        let graph = Graph::new_with_seed(11);
        let cell = Dcgru::new(&graph, &path_adjacency(), options(filter_type, k, gc), "cell")?;
        let inputs = graph.input(&Tensor::new(
            &(0..12).map(|i| i as f32 / 6.0 - 1.0).collect::<Vec<_>>(),
            &[2, 6],
        ))?;
        let hx = graph.zeros(&[2, 12])?;
        let h = cell.forward(&inputs, &hx)?.compute()?;
        assert_eq!(h.shape(), &[2, 12]);
        // 初始状态为0时 h' = (1 - u) ⊙ c，|c| <= 1
        assert!(h.to_vec().iter().all(|v| v.abs() <= 1.0));
    }
    Ok(())
}

#[test]
fn test_dcgru_rejects_bad_shapes() -> Result<(), GraphError> {
    let graph = Graph::new();
    let bad_adj = Tensor::ones(&[2, 2]);
    assert!(Dcgru::new(&graph, &bad_adj, options(FilterType::Laplacian, 2, true), "a").is_err());

    let cell = Dcgru::new(&graph, &path_adjacency(), options(FilterType::Laplacian, 2, true), "b")?;
    let inputs = graph.input(&Tensor::ones(&[2, 6]))?;
    let bad_inputs = graph.input(&Tensor::ones(&[2, 5]))?;
    let hx = graph.zeros(&[2, 12])?;
    let bad_hx = graph.zeros(&[1, 12])?;
    assert!(matches!(
        cell.forward(&bad_inputs, &hx),
        Err(GraphError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        cell.forward(&inputs, &bad_hx),
        Err(GraphError::ShapeMismatch { .. })
    ));

    let mut zero_units = options(FilterType::Laplacian, 2, true);
    zero_units.num_units = 0;
    assert!(Dcgru::new(&graph, &path_adjacency(), zero_units, "c").is_err());
    Ok(())
}

#[test]
fn test_dcgru_supports_survive_transient_release() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(5);
    let cell = Dcgru::new(&graph, &path_adjacency(), options(FilterType::DualRandomWalk, 2, true), "cell")?;
    let run = || -> Result<Tensor, GraphError> {
        let inputs = graph.input(&Tensor::ones(&[1, 6]))?;
        let hx = graph.zeros(&[1, 12])?;
        cell.forward(&inputs, &hx)?.compute()
    };
    let first = run()?;
    graph.release_transient_nodes();
    // 2个支撑矩阵常量 + 4个参数
    assert_eq!(graph.inner().nodes_count(), 6);
    assert_eq!(run()?, first);
    Ok(())
}
