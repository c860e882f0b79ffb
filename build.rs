fn main() {
    // Emits the ESP-IDF link/include directives when building for the
    // target; a no-op for host builds and tests.
    embuild::espidf::sysenv::output();
}
