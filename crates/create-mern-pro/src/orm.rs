//! ORM/ODM wiring for the backend manifest

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::manifest::{PackageJson, Requirements};
use crate::model::{BackendConfig, Database, Orm};

/// Node packages belonging to some ORM; cleared before the selected one is added
const NODE_ORM_PACKAGES: &[&str] = &["prisma", "@prisma/client", "typeorm", "sequelize", "mongoose"];

/// Substrings identifying Python ORM/driver requirement lines
const PYTHON_ORM_MARKERS: &[&str] = &["sqlalchemy", "motor", "mongoengine", "psycopg2", "pymongo"];

/// Apply the selected ORM to the generated backend
pub fn configure(backend_dir: &Path, backend: &BackendConfig) -> Result<()> {
    if backend.runtime.is_node() {
        configure_node(backend_dir, backend.orm, backend.database)
    } else {
        configure_python(backend_dir, backend.orm, backend.database)
    }
}

fn configure_node(backend_dir: &Path, orm: Orm, database: Database) -> Result<()> {
    let Some(mut pkg) = PackageJson::load(&backend_dir.join("package.json"))? else {
        tracing::debug!("no package.json in backend, skipping ORM setup");
        return Ok(());
    };

    for package in NODE_ORM_PACKAGES {
        pkg.remove_dependency(package);
    }
    pkg.remove_dev_dependency("prisma");

    match orm {
        Orm::Prisma => {
            pkg.add_dependency("@prisma/client", "^5.0.0");
            pkg.add_dev_dependency("prisma", "^5.0.0");
        }
        Orm::TypeOrm => {
            pkg.add_dependency("typeorm", "^0.3.0");
            pkg.add_dependency("reflect-metadata", "^0.1.13");
        }
        Orm::Sequelize => pkg.add_dependency("sequelize", "^6.35.0"),
        Orm::Mongoose => pkg.add_dependency("mongoose", "^8.0.0"),
        _ => {}
    }

    if orm.needs_sql_driver() {
        match database {
            Database::PostgreSql => pkg.add_dependency("pg", "^8.11.0"),
            Database::MySql => pkg.add_dependency("mysql2", "^3.6.0"),
            // Prisma ships its own SQLite engine
            Database::Sqlite if orm != Orm::Prisma => pkg.add_dependency("sqlite3", "^5.1.6"),
            _ => {}
        }
    }

    pkg.save()?;

    if orm == Orm::Prisma {
        write_prisma_schema(backend_dir, database)?;
    }

    tracing::info!(orm = orm.as_str(), database = database.as_str(), "configured backend ORM");
    Ok(())
}

fn configure_python(backend_dir: &Path, orm: Orm, database: Database) -> Result<()> {
    let Some(mut requirements) = Requirements::load(&backend_dir.join("requirements.txt"))? else {
        tracing::debug!("no requirements.txt in backend, skipping ORM setup");
        return Ok(());
    };

    requirements.remove_containing(PYTHON_ORM_MARKERS);

    match orm {
        Orm::SqlAlchemy => {
            requirements.push("sqlalchemy==2.0.23");
            match database {
                Database::PostgreSql => requirements.push("psycopg2-binary==2.9.9"),
                Database::MySql => requirements.push("pymysql==1.1.0"),
                _ => {}
            }
        }
        Orm::Motor => requirements.push("motor==3.3.2"),
        Orm::MongoEngine => requirements.push("mongoengine==0.27.0"),
        Orm::None if database == Database::MongoDb => requirements.push("pymongo==4.6.1"),
        _ => {}
    }

    requirements.save()?;

    tracing::info!(orm = orm.as_str(), database = database.as_str(), "configured backend ORM");
    Ok(())
}

/// Render `prisma/schema.prisma` for the database
pub fn prisma_schema(database: Database) -> String {
    let (provider, id_field) = match database {
        Database::PostgreSql => ("postgresql", "String   @id @default(uuid())"),
        Database::MySql => ("mysql", "String   @id @default(uuid())"),
        Database::Sqlite => ("sqlite", "String   @id @default(uuid())"),
        Database::MongoDb => ("mongodb", "String   @id @default(auto()) @map(\"_id\") @db.ObjectId"),
    };

    format!(
        r#"// This is your Prisma schema file
// Learn more about it in the docs: https://pris.ly/d/prisma-schema

generator client {{
  provider = "prisma-client-js"
}}

datasource db {{
  provider = "{provider}"
  url      = env("{url_var}")
}}

model User {{
  id        {id_field}
  email     String   @unique
  name      String?
  password  String
  createdAt DateTime @default(now())
  updatedAt DateTime @updatedAt
}}
"#,
        url_var = if database == Database::MongoDb {
            "MONGODB_URI"
        } else {
            "DATABASE_URL"
        },
    )
}

fn write_prisma_schema(backend_dir: &Path, database: Database) -> Result<()> {
    let prisma_dir = backend_dir.join("prisma");
    fs::create_dir_all(&prisma_dir)
        .with_context(|| format!("Failed to create {}", prisma_dir.display()))?;
    let path = prisma_dir.join("schema.prisma");
    fs::write(&path, prisma_schema(database))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
