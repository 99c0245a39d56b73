use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, Pat};

/// Turns a function into an opaque block of work for the purpose of timing it.
///
/// The annotated function is marked `#[inline(never)]`, so that it always remains a real call
/// whose execution falls between two counter samples taken by the caller. In addition, every
/// argument is passed through [core::hint::black_box] on entry, and the value produced by the
/// function body is passed through [core::hint::black_box] before being returned. This prevents
/// the optimizer from constant-folding the work based on the (usually constant) arguments at the
/// call site, and from concluding that the result is unused.
///
/// Note that an early `return` inside the body bypasses the wrapping of the return value, so timed
/// functions should produce their result as the final expression of the body instead.
///
/// Only plain identifier arguments are supported (e.g. `iters: u32`, not `(a, b): (u32, u32)`),
/// and methods taking `self` are rejected.
#[proc_macro_attribute]
pub fn opaque_kernel(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "opaque_kernel does not take any arguments",
        )
        .to_compile_error()
        .into();
    }
    let mut func = parse_macro_input!(item as ItemFn);

    // Rebind each argument to a black-boxed copy of itself. Any `mut` moves from the signature to
    // the rebinding, so that bodies which modify their arguments still compile.
    let mut rebinds = Vec::new();
    for input in func.sig.inputs.iter_mut() {
        let FnArg::Typed(pat_type) = input else {
            return syn::Error::new_spanned(input, "opaque_kernel does not support methods")
                .to_compile_error()
                .into();
        };
        let Pat::Ident(pat_ident) = &mut *pat_type.pat else {
            return syn::Error::new_spanned(
                &pat_type.pat,
                "opaque_kernel only supports plain identifier arguments",
            )
            .to_compile_error()
            .into();
        };
        let ident = &pat_ident.ident;
        let mutability = pat_ident.mutability.take();
        rebinds.push(quote! {
            let #mutability #ident = ::core::hint::black_box(#ident);
        });
    }

    let attrs = &func.attrs;
    let vis = &func.vis;
    let sig = &func.sig;
    let body = &func.block;
    TokenStream::from(quote! {
        #(#attrs)*
        #[inline(never)]
        #vis #sig {
            #(#rebinds)*
            ::core::hint::black_box(#body)
        }
    })
}
