fn main() {
    // Emits ESP-IDF link/env metadata when building for espidf;
    // prints nothing on plain host builds.
    embuild::espidf::sysenv::output();
}
