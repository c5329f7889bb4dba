use criterion::{black_box, criterion_group, criterion_main, Criterion};
use langgraph_core::StateGraph;
use serde_json::json;

fn sequential_graph_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("sequential 5-node graph invoke", |b| {
        b.to_async(&runtime).iter(|| async {
            let mut graph = StateGraph::new();
            for i in 0..5 {
                graph.add_node(format!("node_{i}"), |state: serde_json::Value| {
                    Box::pin(async move { Ok(state) })
                });
            }
            graph.add_edge("__start__", "node_0");
            for i in 0..4 {
                graph.add_edge(format!("node_{i}"), format!("node_{}", i + 1));
            }
            graph.add_edge("node_4", "__end__");

            let compiled = graph.compile().unwrap();
            compiled.invoke(black_box(json!({"count": 0}))).await.unwrap();
        });
    });
}

fn checkpointed_graph_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("checkpointed 3-node graph invoke", |b| {
        b.to_async(&runtime).iter(|| async {
            use langgraph_checkpoint::InMemoryCheckpointSaver;
            use langgraph_core::CheckpointConfig;
            use std::sync::Arc;

            let mut graph = StateGraph::new();
            for i in 0..3 {
                graph.add_node(format!("node_{i}"), |state: serde_json::Value| {
                    Box::pin(async move { Ok(state) })
                });
            }
            graph.add_edge("__start__", "node_0");
            graph.add_edge("node_0", "node_1");
            graph.add_edge("node_1", "node_2");
            graph.add_edge("node_2", "__end__");

            let compiled = graph
                .compile()
                .unwrap()
                .with_checkpointer(Arc::new(InMemoryCheckpointSaver::new()));
            let config = CheckpointConfig::new().with_thread_id("bench-thread".to_string());

            compiled
                .invoke_with_config(black_box(json!({"count": 0})), Some(config))
                .await
                .unwrap();
        });
    });
}

criterion_group!(benches, sequential_graph_benchmark, checkpointed_graph_benchmark);
criterion_main!(benches);
