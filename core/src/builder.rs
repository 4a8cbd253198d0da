#![deny(missing_docs)]

//! # Model Builder
//!
//! Walks the declaration tree and produces a sorted [`Package`].
//!
//! - One worker per file extracts enums, messages (nested types first) and services.
//! - Workers are joined before anything reads the aggregated dictionaries.
//! - Results are merged in file order on a single thread, so the first
//!   registration of a duplicated name is deterministic.

use crate::comments::{
    CommentTable, StructuralPath, PATH_ENUM, PATH_ENUM_VALUE, PATH_MESSAGE, PATH_MESSAGE_ENUM,
    PATH_MESSAGE_FIELD, PATH_MESSAGE_MESSAGE, PATH_SERVICE, PATH_SERVICE_METHOD,
};
use crate::descriptor::http_rule::Pattern;
use crate::descriptor::{
    CodeGeneratorRequest, DescriptorProto, EnumDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto,
};
use crate::error::{AppError, AppResult};
use crate::model::{
    ContentType, Enum, EnumField, HttpMethod, JsonType, Message, MessageField, Package, Service,
    ServiceMethod,
};
use std::thread;
use tracing::{debug, warn};

/// Packages whose declarations are never documented.
pub const RESERVED_NAMESPACES: &[&str] = &["google.protobuf", "google.api"];

/// Separator joining enclosing type names with a nested type name.
pub const NESTED_SEPARATOR: &str = "_";

/// Builds the package for a plugin request.
///
/// The package is named after the first file to generate.
pub fn build_package(request: &CodeGeneratorRequest, version: &str) -> AppResult<Package> {
    let name = request
        .file_to_generate
        .first()
        .and_then(|target| request.proto_file.iter().find(|f| f.name() == target))
        .or_else(|| request.proto_file.first())
        .map(|f| f.package().to_string())
        .unwrap_or_default();

    build_package_from_files(name, version, &request.proto_file)
}

/// Builds a package from a set of files.
///
/// Files in a [`RESERVED_NAMESPACES`] package are skipped. Any malformed type
/// reference aborts the whole build.
pub fn build_package_from_files(
    name: impl Into<String>,
    version: impl Into<String>,
    files: &[FileDescriptorProto],
) -> AppResult<Package> {
    let packages = known_packages(files);

    let models = thread::scope(|scope| {
        let handles: Vec<_> = files
            .iter()
            .filter(|file| !is_reserved(file.package()))
            .map(|file| {
                let packages = &packages;
                scope.spawn(move || FileVisitor::new(file, packages).visit())
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| AppError::General("file worker panicked".into()))?
            })
            .collect::<AppResult<Vec<_>>>()
    })?;

    let mut package = Package::new(name, version);
    for model in models {
        for def in model.enums {
            let name = def.name.clone();
            if !package.append_enum(def) {
                warn!(file = %model.file, name = %name, "duplicate enum dropped");
            }
        }
        for def in model.messages {
            let name = def.name.clone();
            if !package.append_message(def) {
                warn!(file = %model.file, name = %name, "duplicate message dropped");
            }
        }
        for service in model.services {
            package.append_service(service);
        }
    }

    package.sort();
    debug!(
        package = %package.name,
        services = package.services.len(),
        messages = package.messages.len(),
        enums = package.enums.len(),
        "package built"
    );
    Ok(package)
}

/// Whether `package` lies in a reserved namespace.
pub fn is_reserved(package: &str) -> bool {
    RESERVED_NAMESPACES
        .iter()
        .any(|ns| package == *ns || package.starts_with(&format!("{}.", ns)))
}

/// Splits a fully-qualified type reference such as `.foo.bar.Outer.Inner` into
/// its package (`foo.bar`) and synthesized local name (`Outer_Inner`).
///
/// `packages` must be ordered longest first; the longest matching package wins.
/// Without a match the first segment is taken as the package.
pub fn split_type_name(type_name: &str, packages: &[String]) -> AppResult<(String, String)> {
    let trimmed = type_name.trim_start_matches('.');

    for package in packages.iter().filter(|p| !p.is_empty()) {
        if let Some(local) = trimmed
            .strip_prefix(package.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
        {
            if local.is_empty() {
                break;
            }
            return Ok((package.clone(), local.replace('.', NESTED_SEPARATOR)));
        }
    }

    let segments: Vec<&str> = trimmed.split('.').collect();
    if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(AppError::MalformedTypeName(type_name.to_string()));
    }
    Ok((segments[0].to_string(), segments[1..].join(NESTED_SEPARATOR)))
}

fn known_packages(files: &[FileDescriptorProto]) -> Vec<String> {
    let mut packages: Vec<String> = files.iter().map(|f| f.package().to_string()).collect();
    packages.sort_by(|l, r| r.len().cmp(&l.len()).then_with(|| l.cmp(r)));
    packages.dedup();
    packages
}

fn nested_name(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{}{}{}", parent, NESTED_SEPARATOR, name),
        None => name.to_string(),
    }
}

fn method_path(service: &str, method: &str) -> String {
    format!("/{}/{}", service, method)
}

/// Declarations extracted from one file.
#[derive(Debug, Default)]
struct FileModel {
    file: String,
    enums: Vec<Enum>,
    messages: Vec<Message>,
    services: Vec<Service>,
}

struct FileVisitor<'a> {
    file: &'a FileDescriptorProto,
    packages: &'a [String],
    comments: CommentTable,
    model: FileModel,
}

impl<'a> FileVisitor<'a> {
    fn new(file: &'a FileDescriptorProto, packages: &'a [String]) -> Self {
        Self {
            file,
            packages,
            comments: CommentTable::from_source_info(file.source_code_info.as_ref()),
            model: FileModel {
                file: file.name().to_string(),
                ..Default::default()
            },
        }
    }

    fn visit(mut self) -> AppResult<FileModel> {
        debug!(file = self.file.name(), comments = self.comments.len(), "parsing file");
        let file = self.file;

        for (idx, def) in file.enum_type.iter().enumerate() {
            let mut path = StructuralPath::root(PATH_ENUM, idx);
            self.visit_enum(def, None, &mut path);
        }

        for (idx, def) in file.message_type.iter().enumerate() {
            let mut path = StructuralPath::root(PATH_MESSAGE, idx);
            self.visit_message(def, None, &mut path)?;
        }

        for (idx, def) in file.service.iter().enumerate() {
            let mut path = StructuralPath::root(PATH_SERVICE, idx);
            let service = self.visit_service(def, &mut path)?;
            self.model.services.push(service);
        }

        Ok(self.model)
    }

    fn visit_enum(
        &mut self,
        def: &EnumDescriptorProto,
        parent: Option<&str>,
        path: &mut StructuralPath,
    ) {
        let name = nested_name(parent, def.name());
        let mut enumeration = Enum::new(&name, self.comments.comment(&name, path.as_slice()));

        for (idx, value) in def.value.iter().enumerate() {
            path.push(PATH_ENUM_VALUE, idx);
            enumeration.fields.push(EnumField {
                name: value.name().to_string(),
                value: value.number(),
                description: self.comments.comment(value.name(), path.as_slice()),
            });
            path.pop();
        }

        self.model.enums.push(enumeration);
    }

    /// Nested enums and messages are registered before the message itself.
    fn visit_message(
        &mut self,
        def: &DescriptorProto,
        parent: Option<&str>,
        path: &mut StructuralPath,
    ) -> AppResult<()> {
        let name = nested_name(parent, def.name());

        for (idx, nested) in def.enum_type.iter().enumerate() {
            path.push(PATH_MESSAGE_ENUM, idx);
            self.visit_enum(nested, Some(&name), path);
            path.pop();
        }

        for (idx, nested) in def.nested_type.iter().enumerate() {
            path.push(PATH_MESSAGE_MESSAGE, idx);
            self.visit_message(nested, Some(&name), path)?;
            path.pop();
        }

        let mut message = Message::new(&name, self.comments.comment(&name, path.as_slice()));
        for (idx, field) in def.field.iter().enumerate() {
            path.push(PATH_MESSAGE_FIELD, idx);
            message.fields.push(self.visit_field(&name, field, path)?);
            path.pop();
        }

        self.model.messages.push(message);
        Ok(())
    }

    fn visit_field(
        &self,
        owner: &str,
        def: &FieldDescriptorProto,
        path: &StructuralPath,
    ) -> AppResult<MessageField> {
        let proto_type = def.r#type();
        let mut field = MessageField {
            message_name: owner.to_string(),
            description: self.comments.comment(def.name(), path.as_slice()),
            proto_name: def.name().to_string(),
            proto_type,
            proto_label: def.label(),
            proto_type_name: proto_type.as_str_name().to_string(),
            proto_full_name: String::new(),
            proto_package_path: String::new(),
            proto_number: def.number(),
        };

        if JsonType::from(proto_type) == JsonType::Object {
            let (package, local) = split_type_name(def.type_name(), self.packages)?;
            field.proto_type_name = local;
            field.proto_package_path = package;
            field.proto_full_name = def.type_name().to_string();
        }

        Ok(field)
    }

    fn visit_service(
        &self,
        def: &ServiceDescriptorProto,
        path: &mut StructuralPath,
    ) -> AppResult<Service> {
        let mut service = Service::new(def.name(), self.comments.comment(def.name(), path.as_slice()));

        for (idx, method) in def.method.iter().enumerate() {
            path.push(PATH_SERVICE_METHOD, idx);
            let mut method = self.visit_method(method, path)?;
            path.pop();

            if method.path.is_empty() {
                method.path = method_path(&service.name, &method.name);
            }
            service.methods.push(method);
        }

        Ok(service)
    }

    fn visit_method(
        &self,
        def: &MethodDescriptorProto,
        path: &StructuralPath,
    ) -> AppResult<ServiceMethod> {
        let mut method =
            ServiceMethod::new(def.name(), self.comments.comment(def.name(), path.as_slice()));
        method.request_name = split_type_name(def.input_type(), self.packages)?.1;
        method.response_name = split_type_name(def.output_type(), self.packages)?.1;

        let options = def.options.as_ref();
        if let Some(pattern) = options
            .and_then(|o| o.http.as_ref())
            .and_then(|h| h.pattern.as_ref())
        {
            let route = match pattern {
                Pattern::Get(uri) => Some((HttpMethod::Get, uri)),
                Pattern::Put(uri) => Some((HttpMethod::Put, uri)),
                Pattern::Post(uri) => Some((HttpMethod::Post, uri)),
                Pattern::Delete(uri) => Some((HttpMethod::Delete, uri)),
                Pattern::Patch(uri) => {
                    warn!(method = def.name(), path = %uri, "PATCH is not documented, using the default route");
                    None
                }
            };
            if let Some((verb, uri)) = route {
                method.method = verb;
                method.path = uri.clone();
            }
        }

        let mut consume = None;
        if let Some(rule) = options.and_then(|o| o.apidoc.as_ref()) {
            if !rule.consume.is_empty() {
                consume = Some(ContentType::new(&rule.consume));
            }
            if !rule.produce.is_empty() {
                method.produce = ContentType::new(&rule.produce);
            }
        }
        if consume.is_none() && method.method != HttpMethod::Get {
            consume = Some(ContentType::json());
        }
        method.consume = consume;

        Ok(method)
    }
}
