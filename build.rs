fn main() {
    println!("cargo:rerun-if-env-changed=GARDENER_CONFIG");

    // Host builds (tests, simulation) have no ESP-IDF toolchain to probe.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
