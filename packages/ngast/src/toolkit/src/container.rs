// Toolkit Container
//
// Builds every analysis service of a session on first use and keeps it.
// Services only ask for services earlier in the chain:
// program -> dependency graph -> reflector -> {evaluator, metadata} -> scopes
// -> resource loader -> handlers -> trait compiler -> provider registry.

use super::config::NgastOptions;
use crate::annotations::common::HandlerContext;
use crate::annotations::{
    ComponentDecoratorHandler, DirectiveDecoratorHandler, InjectableDecoratorHandler, NgModuleDecoratorHandler,
    PipeDecoratorHandler,
};
use crate::diagnostics::{NgastError, NgastResult};
use crate::incremental::FileDependencyGraph;
use crate::logging::Logger;
use crate::metadata::{CompoundMetadataReader, DtsMetadataReader, LocalMetadataRegistry, MetadataReader};
use crate::partial_evaluator::PartialEvaluator;
use crate::providers::ProviderRegistry;
use crate::reflection::{ReflectionHost, TypeScriptReflectionHost};
use crate::resource::{ResourceLoader, ResourceResolver};
use crate::scope::{ComponentScopeReader, LocalModuleScopeRegistry};
use crate::transform::{DecoratorHandler, TraitCompiler};
use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::rc::Rc;
use ts::{Program, ProgramHost};

pub struct ToolkitContainer {
    options: NgastOptions,
    host: Rc<dyn ProgramHost>,
    resources: Rc<dyn ResourceResolver>,
    logger: Rc<dyn Logger>,
    /// Services whose construction is running, outermost first.
    constructing: RefCell<Vec<&'static str>>,

    program: OnceCell<Rc<Program>>,
    dependencies: OnceCell<Rc<FileDependencyGraph>>,
    reflector: OnceCell<Rc<dyn ReflectionHost>>,
    evaluator: OnceCell<Rc<PartialEvaluator>>,
    local_metadata: OnceCell<Rc<LocalMetadataRegistry>>,
    metadata: OnceCell<Rc<dyn MetadataReader>>,
    module_scopes: OnceCell<Rc<LocalModuleScopeRegistry>>,
    component_scopes: OnceCell<Rc<ComponentScopeReader>>,
    resource_loader: OnceCell<Rc<ResourceLoader>>,
    handler_context: OnceCell<Rc<HandlerContext>>,
    trait_compiler: OnceCell<Rc<TraitCompiler>>,
    provider_registry: OnceCell<Rc<ProviderRegistry>>,
}

impl ToolkitContainer {
    /// Validates `options`; nothing is built until first asked for.
    pub fn new(
        options: NgastOptions,
        host: Rc<dyn ProgramHost>,
        resources: Rc<dyn ResourceResolver>,
        logger: Rc<dyn Logger>,
    ) -> NgastResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            host,
            resources,
            logger,
            constructing: RefCell::new(Vec::new()),
            program: OnceCell::new(),
            dependencies: OnceCell::new(),
            reflector: OnceCell::new(),
            evaluator: OnceCell::new(),
            local_metadata: OnceCell::new(),
            metadata: OnceCell::new(),
            module_scopes: OnceCell::new(),
            component_scopes: OnceCell::new(),
            resource_loader: OnceCell::new(),
            handler_context: OnceCell::new(),
            trait_compiler: OnceCell::new(),
            provider_registry: OnceCell::new(),
        })
    }

    pub fn options(&self) -> &NgastOptions {
        &self.options
    }

    pub fn logger(&self) -> Rc<dyn Logger> {
        self.logger.clone()
    }

    /// The memoized service in `cell`, built by `build` on first use.
    pub(crate) fn get<T: Clone>(
        &self,
        cell: &OnceCell<T>,
        key: &'static str,
        build: impl FnOnce() -> NgastResult<T>,
    ) -> NgastResult<T> {
        if let Some(service) = cell.get() {
            return Ok(service.clone());
        }
        if self.constructing.borrow().contains(&key) {
            let mut trail: Vec<String> = self.constructing.borrow().iter().map(|k| k.to_string()).collect();
            trail.push(key.to_string());
            return Err(NgastError::ServiceCycle { trail });
        }

        self.constructing.borrow_mut().push(key);
        self.logger.debug(&format!("constructing {}", key));
        let built = build();
        self.constructing.borrow_mut().pop();

        let service = built?;
        // `build` cannot have filled the cell: a nested request for `key` fails above.
        let _ = cell.set(service.clone());
        Ok(service)
    }

    pub fn program(&self) -> NgastResult<Rc<Program>> {
        self.get(&self.program, "program", || {
            let root_names = self.options.root_names(self.host.as_ref())?;
            let program = Program::from_host(self.host.as_ref(), &root_names, self.options.to_compiler_options())
                .map_err(|e| NgastError::Configuration(e.to_string()))?;
            for diagnostic in program.diagnostics() {
                self.logger.warn(&diagnostic.to_string());
            }
            Ok(Rc::new(program))
        })
    }

    pub fn dependencies(&self) -> NgastResult<Rc<FileDependencyGraph>> {
        self.get(&self.dependencies, "dependencies", || {
            Ok(Rc::new(FileDependencyGraph::from_program(&*self.program()?)))
        })
    }

    pub fn reflector(&self) -> NgastResult<Rc<dyn ReflectionHost>> {
        self.get(&self.reflector, "reflector", || {
            Ok(Rc::new(TypeScriptReflectionHost::new(self.program()?)) as Rc<dyn ReflectionHost>)
        })
    }

    pub fn evaluator(&self) -> NgastResult<Rc<PartialEvaluator>> {
        self.get(&self.evaluator, "evaluator", || {
            Ok(Rc::new(PartialEvaluator::new(
                self.program()?,
                self.dependencies()?,
                self.options.max_evaluation_depth,
            )))
        })
    }

    pub fn local_metadata(&self) -> NgastResult<Rc<LocalMetadataRegistry>> {
        self.get(&self.local_metadata, "local_metadata", || Ok(Rc::new(LocalMetadataRegistry::new())))
    }

    /// Local registrations first, then pre-compiled declaration markers.
    pub fn metadata(&self) -> NgastResult<Rc<dyn MetadataReader>> {
        self.get(&self.metadata, "metadata", || {
            let local: Rc<dyn MetadataReader> = self.local_metadata()?;
            let dts: Rc<dyn MetadataReader> = Rc::new(DtsMetadataReader::new(self.program()?));
            Ok(Rc::new(CompoundMetadataReader::new(vec![local, dts])) as Rc<dyn MetadataReader>)
        })
    }

    pub fn module_scopes(&self) -> NgastResult<Rc<LocalModuleScopeRegistry>> {
        self.get(&self.module_scopes, "module_scopes", || {
            Ok(Rc::new(LocalModuleScopeRegistry::new(self.metadata()?, self.logger.clone())))
        })
    }

    pub fn component_scopes(&self) -> NgastResult<Rc<ComponentScopeReader>> {
        self.get(&self.component_scopes, "component_scopes", || {
            Ok(Rc::new(ComponentScopeReader::new(self.local_metadata()?, self.module_scopes()?)))
        })
    }

    pub fn resource_loader(&self) -> NgastResult<Rc<ResourceLoader>> {
        self.get(&self.resource_loader, "resource_loader", || {
            Ok(Rc::new(ResourceLoader::new(
                self.resources.clone(),
                self.dependencies()?,
                self.logger.clone(),
            )))
        })
    }

    pub fn handler_context(&self) -> NgastResult<Rc<HandlerContext>> {
        self.get(&self.handler_context, "handler_context", || {
            Ok(Rc::new(HandlerContext {
                program: self.program()?,
                reflector: self.reflector()?,
                evaluator: self.evaluator()?,
                local_metadata: self.local_metadata()?,
                metadata: self.metadata()?,
                logger: self.logger.clone(),
                strict_injection_parameters: self.options.strict_injection_parameters,
            }))
        })
    }

    pub fn trait_compiler(&self) -> NgastResult<Rc<TraitCompiler>> {
        self.get(&self.trait_compiler, "trait_compiler", || {
            let cx = self.handler_context()?;
            let handlers: Vec<Rc<dyn DecoratorHandler>> = vec![
                Rc::new(ComponentDecoratorHandler::new(
                    cx.clone(),
                    self.resource_loader()?,
                    self.component_scopes()?,
                )),
                Rc::new(DirectiveDecoratorHandler::new(cx.clone())),
                Rc::new(PipeDecoratorHandler::new(cx.clone())),
                Rc::new(InjectableDecoratorHandler::new(cx.clone())),
                Rc::new(NgModuleDecoratorHandler::new(cx, self.module_scopes()?)),
            ];
            Ok(Rc::new(TraitCompiler::new(handlers, self.program()?, self.logger.clone())))
        })
    }

    pub fn provider_registry(&self) -> NgastResult<Rc<ProviderRegistry>> {
        self.get(&self.provider_registry, "provider_registry", || {
            Ok(Rc::new(ProviderRegistry::new(
                self.evaluator()?,
                self.logger.clone(),
                self.options.max_provider_depth,
            )))
        })
    }
}
