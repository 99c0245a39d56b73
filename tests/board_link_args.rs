//! Checks the linker arguments emitted by the board crate's build script. The firmware itself can
//! only be linked for the board's target, so this is checked on the build script's source instead.

const BUILD_SCRIPT: &str = include_str!("../neorv32/build.rs");

fn link_arg_position(script: &str) -> impl Fn(&str) -> Option<usize> + '_ {
    move |arg| script.find(&format!("cargo:rustc-link-arg={arg}\""))
}

#[test]
fn memory_layout_is_passed_before_runtime_linker_script() {
    let position = link_arg_position(BUILD_SCRIPT);
    let memory = position("-Tmemory.x").expect("memory.x isn't passed to the linker");
    let runtime = position("-Tlink.x").expect("link.x isn't passed to the linker");
    assert!(memory < runtime);
}
