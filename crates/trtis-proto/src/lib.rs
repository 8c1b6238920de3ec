pub mod nvidia {
    pub mod inferenceserver {
        tonic::include_proto!("nvidia.inferenceserver");
    }
}
