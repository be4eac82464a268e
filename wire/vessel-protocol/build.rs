fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protoc = protoc_bin_vendored::protoc_bin_path().expect("vendored protoc binary");
    std::env::set_var("PROTOC", protoc);

    println!("cargo:rerun-if-changed=proto/vessel.proto");

    tonic_prost_build::configure()
        .build_server(false)
        .compile_protos(&["proto/vessel.proto"], &["proto"])?;

    Ok(())
}
