//! Boilerplate file contents, keyed by file name

const GITIGNORE: &str = "node_modules/
dist/
coverage/
*.log
.DS_Store
";

const ESLINT: &str = r#"{
  "root": true,
  "parser": "@typescript-eslint/parser",
  "plugins": ["@typescript-eslint"],
  "extends": [
    "eslint:recommended",
    "plugin:@typescript-eslint/recommended",
    "prettier"
  ],
  "ignorePatterns": ["dist", "coverage"]
}
"#;

const PRETTIER: &str = r#"{
  "singleQuote": true,
  "trailingComma": "all",
  "printWidth": 100
}
"#;

const VSCODE_SETTINGS: &str = r#"{
  "editor.codeActionsOnSave": {
    "source.fixAll.eslint": "explicit"
  },
  "editor.defaultFormatter": "esbenp.prettier-vscode",
  "editor.formatOnSave": true,
  "eslint.validate": ["typescript"],
  "files.autoSave": "onFocusChange",
  "typescript.preferences.importModuleSpecifier": "non-relative"
}
"#;

const MAIN_TS: &str = r#"export function sum(a: number, b: number): number {
  return a + b;
}

console.log("Run 'npm run update-kata' to compile and run this file.");
"#;

const MAIN_TEST_TS: &str = r#"import { sum } from '../src/main';

describe('sum', () => {
  test('adds 1 and 2 to make 3', () => {
    expect(sum(1, 2)).toBe(3);
  });
});
"#;

const JEST_CONFIG: &str = r#"/** @type {import('ts-jest').JestConfigWithTsJest} */
module.exports = {
  preset: 'ts-jest',
  testEnvironment: 'node',
  roots: ['<rootDir>/tests'],
};
"#;

const README: &str = "# Kata

Describe the kata here.

## Commands

- `npm run help` - list the available scripts.
- `npm test` - run all tests.
- `npm run coverage` - run all tests with a coverage report.
- `npm run compile` - compile TypeScript into `dist/`.
- `npm run kata` - run the compiled kata.
- `npm run update-kata` - compile, then run the kata.
";

const NOTES: &str = "# Notes

## Done

## To do

## In progress

## Parked
";

const TECHDEBT: &str = "# Tech debt
";

/// Every template, by the name steps refer to it with
pub const TEMPLATES: &[(&str, &str)] = &[
    (".gitignore", GITIGNORE),
    (".eslintrc.json", ESLINT),
    (".prettierrc", PRETTIER),
    ("settings.json", VSCODE_SETTINGS),
    ("main.ts", MAIN_TS),
    ("main.test.ts", MAIN_TEST_TS),
    ("jest.config.js", JEST_CONFIG),
    ("README.md", README),
    ("NOTES.md", NOTES),
    ("TECHDEBT.md", TECHDEBT),
];

/// Look up a template's bytes by name
pub fn lookup(name: &str) -> Option<&'static [u8]> {
    TEMPLATES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, content)| content.as_bytes())
}
