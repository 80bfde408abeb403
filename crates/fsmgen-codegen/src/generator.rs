//! Rust code generation
//!
//! Turns a validated [`Machine`] into Rust source. Tokens are built with
//! `quote` and printed with `prettyplease`, so the output is formatted and
//! byte-for-byte reproducible for a given machine and options.
//!
//! The generated `event` method is the transition contract:
//!
//! 1. look up `(state, event)`; a miss is `Error::InvalidEvent`
//! 2. evaluate the condition; an error aborts, `false` returns `Ok(())`
//! 3. run the action in the source state; an error aborts
//! 4. commit the target state
//! 5. run the target's entry action; its error is returned after the commit

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use fsmgen_core::{CallbackKind, Machine, StateDef, TransitionDef};

use crate::error::{Error, Result};

/// First line of every generated file
pub const HEADER: &str = "// Code generated by fsmgen; DO NOT EDIT.";

/// Prefix of the header line carrying the source hash
pub const HASH_MARKER: &str = "// fsmgen-source-hash: ";

/// Default crate path of the runtime support types
pub const DEFAULT_RUNTIME_CRATE: &str = "fsmgen_runtime";

/// Options for the generator
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Package overriding the one in the description
    pub package: Option<String>,

    /// Package used when neither `package` nor the description names one
    pub default_package: Option<String>,

    /// Path of the runtime crate referenced by generated code
    pub runtime_crate: String,

    /// Hash written to the header, used by the compiler's cache
    pub source_hash: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            package: None,
            default_package: None,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            source_hash: None,
        }
    }
}

/// How callbacks are reached from generated code
enum Dispatch {
    /// Free functions resolved in the including scope
    Free,
    /// Methods on the collaborator held in the machine
    Iface,
}

impl Dispatch {
    fn call(&self, callback: &str) -> Result<TokenStream> {
        let callback = ident(callback)?;
        Ok(match self {
            Dispatch::Free => quote! { #callback(event, inner.state) },
            Dispatch::Iface => quote! { inner.iface.#callback(event, inner.state) },
        })
    }
}

/// Rust code generator
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GenerateOptions,
}

impl Generator {
    /// Create a generator with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with the given options
    pub fn with_options(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// The options in use
    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate the complete source file for a machine
    pub fn generate(&self, machine: &Machine) -> Result<String> {
        let tokens = self.generate_tokens(machine)?;
        let file: syn::File = syn::parse2(tokens)
            .map_err(|e| Error::GenerationError(format!("generated code does not parse: {}", e)))?;

        let mut source = String::new();
        source.push_str(HEADER);
        source.push('\n');
        if let Some(hash) = &self.options.source_hash {
            source.push_str(HASH_MARKER);
            source.push_str(hash);
            source.push('\n');
        }
        source.push('\n');
        source.push_str(&prettyplease::unparse(&file));

        tracing::debug!(
            machine = %machine.name,
            bytes = source.len(),
            "generated source"
        );

        Ok(source)
    }

    /// Generate the token stream for a machine, without the file header
    pub fn generate_tokens(&self, machine: &Machine) -> Result<TokenStream> {
        let rt = self.runtime_path()?;
        let dispatch = if machine.has_iface() {
            Dispatch::Iface
        } else {
            Dispatch::Free
        };

        let markers = render_markers();
        let constants = render_constants(machine)?;
        let callbacks = render_callback_trait(machine, &rt)?;
        let machine_type = render_machine_struct(machine)?;
        let machine_impl = render_machine_impl(machine, &rt, &dispatch)?;
        let trait_impl = render_state_machine_impl(machine, &rt)?;

        let body = quote! {
            #markers
            #constants
            #callbacks
            #machine_type
            #machine_impl
            #trait_impl
        };

        let package = self
            .options
            .package
            .as_deref()
            .or(machine.package.as_deref())
            .or(self.options.default_package.as_deref());

        match package {
            Some(package) => {
                let package = ident(package)?;
                Ok(quote! {
                    pub mod #package {
                        #[allow(unused_imports)]
                        use super::*;

                        #body
                    }
                })
            }
            None => Ok(body),
        }
    }

    fn runtime_path(&self) -> Result<syn::Path> {
        let raw = self.options.runtime_crate.as_str();
        let qualified = if raw.contains("::") {
            raw.to_string()
        } else {
            format!("::{}", raw)
        };
        syn::parse_str(&qualified).map_err(|e| {
            Error::GenerationError(format!("invalid runtime crate path `{}`: {}", raw, e))
        })
    }
}

fn ident(name: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(name)
        .map_err(|e| Error::GenerationError(format!("`{}` is not a valid identifier: {}", name, e)))
}

fn render_markers() -> TokenStream {
    quote! {
        /// A state the machine can be in.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct State(pub &'static str);

        impl State {
            /// The state name.
            pub const fn as_str(self) -> &'static str {
                self.0
            }
        }

        impl ::std::fmt::Display for State {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.0)
            }
        }

        /// An event the machine can be asked to process.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct Event(pub &'static str);

        impl Event {
            /// The event name.
            pub const fn as_str(self) -> &'static str {
                self.0
            }
        }

        impl ::std::fmt::Display for Event {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.0)
            }
        }
    }
}

fn render_constants(machine: &Machine) -> Result<TokenStream> {
    let mut state_consts = Vec::with_capacity(machine.states.len());
    let mut state_idents = Vec::with_capacity(machine.states.len());
    for state in &machine.states {
        let constant = ident(&state.constant)?;
        let name = &state.name;
        let doc = format!("State `{}`.", name);
        state_consts.push(quote! {
            #[doc = #doc]
            pub const #constant: State = State(#name);
        });
        state_idents.push(constant);
    }

    let mut event_consts = Vec::with_capacity(machine.events.len());
    let mut event_idents = Vec::with_capacity(machine.events.len());
    for event in &machine.events {
        let constant = ident(&event.constant)?;
        let name = &event.name;
        let doc = format!("Event `{}`.", name);
        event_consts.push(quote! {
            #[doc = #doc]
            pub const #constant: Event = Event(#name);
        });
        event_idents.push(constant);
    }

    let initial = initial_constant(machine)?;

    Ok(quote! {
        #(#state_consts)*
        #(#event_consts)*

        /// Placeholder event for `set_state` calls not caused by an event.
        pub const NO_EVENT: Event = Event("");

        /// The state a new machine starts in.
        pub const INITIAL_STATE: State = #initial;

        /// Every state, in description order.
        pub const STATES: &[State] = &[#(#state_idents),*];

        /// Every event, sorted by name.
        pub const EVENTS: &[Event] = &[#(#event_idents),*];
    })
}

fn render_callback_trait(machine: &Machine, rt: &syn::Path) -> Result<TokenStream> {
    let Some(iface) = &machine.iface else {
        return Ok(TokenStream::new());
    };
    let iface = ident(iface)?;

    let methods = machine
        .callbacks()
        .iter()
        .map(|callback| {
            let method = ident(&callback.name)?;
            Ok(match callback.kind {
                CallbackKind::Action => quote! {
                    fn #method(&mut self, event: Event, state: State) -> ::std::result::Result<(), #rt::BoxError>;
                },
                CallbackKind::Condition => quote! {
                    fn #method(&mut self, event: Event, state: State) -> ::std::result::Result<bool, #rt::BoxError>;
                },
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let doc = format!("Callbacks invoked by [`{}`].", machine.name);

    Ok(quote! {
        #[doc = #doc]
        ///
        /// Every method runs while the machine holds its write lock and must
        /// not dispatch events to the same machine.
        #[allow(non_snake_case)]
        pub trait #iface {
            #(#methods)*
        }
    })
}

fn render_machine_struct(machine: &Machine) -> Result<TokenStream> {
    let name = ident(&machine.name)?;
    let inner = format_ident!("{}Inner", name);
    let doc = format!("{} is a state machine.", machine.name);

    Ok(if machine.has_iface() {
        quote! {
            #[doc = #doc]
            #[derive(Debug)]
            pub struct #name<C> {
                inner: ::std::sync::RwLock<#inner<C>>,
            }

            #[derive(Debug)]
            struct #inner<C> {
                state: State,
                iface: C,
            }
        }
    } else {
        quote! {
            #[doc = #doc]
            #[derive(Debug)]
            pub struct #name {
                inner: ::std::sync::RwLock<#inner>,
            }

            #[derive(Debug)]
            struct #inner {
                state: State,
            }
        }
    })
}

fn render_machine_impl(machine: &Machine, rt: &syn::Path, dispatch: &Dispatch) -> Result<TokenStream> {
    let name = ident(&machine.name)?;
    let inner = format_ident!("{}Inner", name);
    let initial = initial_constant(machine)?;

    let (impl_header, constructor) = match &machine.iface {
        Some(iface) => {
            let iface = ident(iface)?;
            (
                quote! { impl<C: #iface> #name<C> },
                quote! {
                    /// Creates a new state machine in the initial state, invoking
                    /// callbacks on `iface`.
                    pub fn new(iface: C) -> Self {
                        Self {
                            inner: ::std::sync::RwLock::new(#inner {
                                state: #initial,
                                iface,
                            }),
                        }
                    }

                    /// Replaces the collaborator callbacks are invoked on.
                    pub fn set_iface(&self, iface: C) {
                        let mut guard = self.inner.write().unwrap_or_else(::std::sync::PoisonError::into_inner);
                        guard.iface = iface;
                    }

                    /// Consumes the machine and returns its collaborator.
                    pub fn into_iface(self) -> C {
                        self.inner
                            .into_inner()
                            .unwrap_or_else(::std::sync::PoisonError::into_inner)
                            .iface
                    }
                },
            )
        }
        None => (
            quote! { impl #name },
            quote! {
                /// Creates a new state machine in the initial state.
                pub fn new() -> Self {
                    Self {
                        inner: ::std::sync::RwLock::new(#inner { state: #initial }),
                    }
                }
            },
        ),
    };

    let set_state = render_set_state(machine, rt, dispatch)?;
    let event = render_event(machine, rt, dispatch)?;

    let default_impl = if machine.has_iface() {
        TokenStream::new()
    } else {
        quote! {
            impl ::std::default::Default for #name {
                fn default() -> Self {
                    Self::new()
                }
            }
        }
    };

    Ok(quote! {
        #impl_header {
            #constructor

            /// Returns the state the machine is in.
            pub fn state(&self) -> State {
                self.inner
                    .read()
                    .unwrap_or_else(::std::sync::PoisonError::into_inner)
                    .state
            }

            #set_state

            #event
        }

        #default_impl
    })
}

fn render_set_state(machine: &Machine, rt: &syn::Path, dispatch: &Dispatch) -> Result<TokenStream> {
    let mut arms = Vec::new();
    for state in machine.states.iter().filter(|s| s.entry.is_some()) {
        let constant = ident(&state.constant)?;
        let entry = entry_call(state, rt, dispatch)?;
        arms.push(quote! {
            #constant => {
                #entry
            }
        });
    }

    let invoke = if arms.is_empty() {
        quote! {
            let _ = (event, invoke_entry_action);
        }
    } else {
        quote! {
            if invoke_entry_action {
                match state {
                    #(#arms)*
                    _ => {}
                }
            }
        }
    };

    Ok(quote! {
        /// Sets the state directly, bypassing the transition table. When
        /// `invoke_entry_action` is true the new state's entry action runs
        /// with `event`.
        pub fn set_state(
            &self,
            state: State,
            event: Event,
            invoke_entry_action: bool,
        ) -> ::std::result::Result<(), #rt::Error> {
            let mut guard = self.inner.write().unwrap_or_else(::std::sync::PoisonError::into_inner);
            let inner = &mut *guard;
            inner.state = state;
            #invoke
            Ok(())
        }
    })
}

fn render_event(machine: &Machine, rt: &syn::Path, dispatch: &Dispatch) -> Result<TokenStream> {
    let mut arms = Vec::with_capacity(machine.transition_count());
    for state in &machine.states {
        for transition in &state.transitions {
            arms.push(render_transition(machine, state, transition, rt, dispatch)?);
        }
    }

    Ok(quote! {
        /// Informs the machine about an event. The machine moves to the
        /// registered target state and invokes the registered callbacks.
        ///
        /// An entry action error is returned after the state has changed.
        pub fn event(&self, event: Event) -> ::std::result::Result<(), #rt::Error> {
            let mut guard = self.inner.write().unwrap_or_else(::std::sync::PoisonError::into_inner);
            let inner = &mut *guard;
            match (inner.state, event) {
                #(#arms)*
                (state, event) => Err(#rt::Error::invalid_event(event.0, state.0)),
            }
        }
    })
}

fn render_transition(
    machine: &Machine,
    state: &StateDef,
    transition: &TransitionDef,
    rt: &syn::Path,
    dispatch: &Dispatch,
) -> Result<TokenStream> {
    let source = ident(&state.constant)?;
    let event = machine
        .event(&transition.event)
        .ok_or_else(|| Error::GenerationError(format!("unknown event `{}`", transition.event)))?;
    let event = ident(&event.constant)?;

    let condition = match &transition.condition {
        Some(condition) => {
            let call = dispatch.call(condition)?;
            quote! {
                if !#call.map_err(#rt::Error::condition)? {
                    return Ok(());
                }
            }
        }
        None => TokenStream::new(),
    };

    let action = match &transition.action {
        Some(action) => {
            let call = dispatch.call(action)?;
            quote! {
                #call.map_err(#rt::Error::action)?;
            }
        }
        None => TokenStream::new(),
    };

    let commit = match &transition.target {
        Some(target) => {
            let target = machine.state(target).ok_or_else(|| {
                Error::GenerationError(format!("unknown target state `{}`", target))
            })?;
            let constant = ident(&target.constant)?;
            let entry = entry_call(target, rt, dispatch)?;
            quote! {
                inner.state = #constant;
                #entry
            }
        }
        None => TokenStream::new(),
    };

    Ok(quote! {
        (#source, #event) => {
            #condition
            #action
            #commit
            Ok(())
        }
    })
}

fn entry_call(state: &StateDef, rt: &syn::Path, dispatch: &Dispatch) -> Result<TokenStream> {
    match &state.entry {
        Some(entry) => {
            let call = dispatch.call(entry)?;
            Ok(quote! {
                #call.map_err(#rt::Error::entry)?;
            })
        }
        None => Ok(TokenStream::new()),
    }
}

fn render_state_machine_impl(machine: &Machine, rt: &syn::Path) -> Result<TokenStream> {
    let name = ident(&machine.name)?;
    let header = match &machine.iface {
        Some(iface) => {
            let iface = ident(iface)?;
            quote! { impl<C: #iface> #rt::StateMachine for #name<C> }
        }
        None => quote! { impl #rt::StateMachine for #name },
    };

    Ok(quote! {
        #header {
            type State = State;
            type Event = Event;

            fn state(&self) -> State {
                Self::state(self)
            }

            fn event(&self, event: Event) -> ::std::result::Result<(), #rt::Error> {
                Self::event(self, event)
            }

            fn set_state(
                &self,
                state: State,
                event: Event,
                invoke_entry_action: bool,
            ) -> ::std::result::Result<(), #rt::Error> {
                Self::set_state(self, state, event, invoke_entry_action)
            }
        }
    })
}

fn initial_constant(machine: &Machine) -> Result<Ident> {
    let initial = machine.initial_state().ok_or_else(|| {
        Error::GenerationError(format!("initial state `{}` does not exist", machine.initial))
    })?;
    ident(&initial.constant)
}
