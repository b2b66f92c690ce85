use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one and inject
/// dependencies.
///
/// Each test gets its own server over a fresh in-memory store. Injectable
/// dependencies are [`rocket::local::asynchronous::Client`],
/// `crate::store::MemoryStore` (the store behind that client), and, with
/// `#[backend_test(owner)]`, a `rocket::http::Header` carrying a bearer token
/// for `crate::model::auth::Caller::example()`.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    let with_owner = match parse_macro_input!(args as Option<Ident>) {
        None => false,
        Some(arg) if arg == "owner" => true,
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `owner` or nothing")
                .into_compile_error()
                .into();
        }
    };

    // Extract type information and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone(), with_owner) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Mint the owner's token if needed.
    let owner = if with_owner {
        quote! {
            #[allow(unused_variables)]
            let owner = crate::model::auth::Caller::example()
                .bearer(&crate::config::Config::example());
        }
    } else {
        quote! {}
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup() -> (rocket::local::asynchronous::Client, crate::store::MemoryStore) {
                log4rs_test_utils::test_logging::init_logging_once_for(
                    ["qcm_backend"],
                    None,
                    None,
                );
                let store = crate::store::MemoryStore::new();
                let rocket_client = rocket::local::asynchronous::Client::tracked(
                    crate::rocket_for_store(store.clone()),
                )
                .await
                .unwrap();
                (rocket_client, store)
            }

            /// The test itself.
            #item_fn

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                #[allow(unused_variables)]
                let (rocket_client, store) = setup().await;
                #owner
                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature, with_owner: bool) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_store = false;
    let mut has_owner = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                // Valid as the last path segment for any type is itself.
                let type_ident = &type_path.path.segments.last().unwrap().ident;
                if type_ident == "Client" {
                    if has_client {
                        return Err(syn::Error::new(
                            input.span(),
                            "Test cannot accept more than one `rocket::local::asynchronous::Client`",
                        ));
                    }
                    has_client = true;
                    args.push(quote! { rocket_client });
                    continue;
                } else if type_ident == "MemoryStore" {
                    if has_store {
                        return Err(syn::Error::new(
                            input.span(),
                            "Test cannot accept more than one `MemoryStore`",
                        ));
                    }
                    has_store = true;
                    args.push(quote! { store.clone() });
                    continue;
                } else if type_ident == "Header" {
                    if !with_owner {
                        return Err(syn::Error::new(
                            input.span(),
                            "A `Header` can only be injected with `#[backend_test(owner)]`",
                        ));
                    }
                    if has_owner {
                        return Err(syn::Error::new(
                            input.span(),
                            "Test cannot accept more than one owner `Header`",
                        ));
                    }
                    has_owner = true;
                    args.push(quote! { owner.clone() });
                    continue;
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client`, `store_ident: MemoryStore` or `owner_ident: Header<'static>`",
        ));
    }

    Ok(args)
}
