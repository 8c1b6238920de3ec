fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["src/grpc_service.proto"], &["src"])?;
    println!("cargo:rerun-if-changed=src/grpc_service.proto");
    Ok(())
}
